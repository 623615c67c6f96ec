//! Error taxonomy for provider calls.

use thiserror::Error;

/// Why a provider call produced no value.
///
/// Raw transport and protocol errors never reach callers; everything is
/// normalized into one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The provider could not resolve the city or location (HTTP 404).
    #[error("Location not found")]
    NotFound,

    /// The API key was rejected or missing (HTTP 401).
    #[error("Authentication with the weather provider failed")]
    AuthFailure,

    /// Any other non-200 response.
    #[error("Weather provider returned status {status}")]
    Provider { status: u16 },

    /// Timeout, DNS or connection-level failure.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// A 200 response whose body we could not decode.
    #[error("Invalid provider payload: {0}")]
    InvalidPayload(String),
}

impl FetchError {
    pub(crate) fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            401 => Self::AuthFailure,
            _ => Self::Provider { status },
        }
    }

    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound => "City not found. Please check the spelling and try again.".to_string(),
            Self::AuthFailure => {
                "Invalid API key. Please check your OpenWeatherMap API key.".to_string()
            }
            Self::Provider { status } => {
                format!("API request failed with status code: {status}")
            }
            Self::Connectivity(_) => {
                "Could not reach the weather service. Check your connection and try again."
                    .to_string()
            }
            Self::InvalidPayload(_) => "The weather service sent an unexpected response.".to_string(),
        }
    }

    /// Whether trying the same call again later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connectivity(_) => true,
            Self::Provider { status } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Connectivity(format!("request timed out: {err}"))
        } else if err.is_decode() {
            Self::InvalidPayload(err.to_string())
        } else {
            Self::Connectivity(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(FetchError::from_status(404), FetchError::NotFound);
        assert_eq!(FetchError::from_status(401), FetchError::AuthFailure);
        assert_eq!(FetchError::from_status(503), FetchError::Provider { status: 503 });
        assert_eq!(FetchError::from_status(429), FetchError::Provider { status: 429 });
    }

    #[test]
    fn auth_failure_has_distinct_message() {
        let auth = FetchError::AuthFailure.user_message();
        let missing = FetchError::NotFound.user_message();
        assert_ne!(auth, missing);
        assert!(auth.contains("API key"));
        assert!(missing.contains("not found"));
    }

    #[test]
    fn provider_message_keeps_status() {
        assert!(FetchError::Provider { status: 502 }.user_message().contains("502"));
    }

    #[test]
    fn retryable_classification() {
        assert!(FetchError::Connectivity("timeout".into()).is_retryable());
        assert!(FetchError::Provider { status: 500 }.is_retryable());
        assert!(!FetchError::Provider { status: 400 }.is_retryable());
        assert!(!FetchError::NotFound.is_retryable());
        assert!(!FetchError::AuthFailure.is_retryable());
    }
}
