//! Live dashboard loop.
//!
//! Fetches run on spawned tasks and report back over a channel tagged with
//! their search ticket; the session decides which results are still wanted.

use anyhow::Result;
use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use weatherdash_core::{
    CityQuery, DashboardSession, OpenWeatherClient, SearchOutcome, SearchTicket, TemperatureUnit,
    fetch_outcome,
};

use crate::render::{self, ForecastLayout};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Like,
    Dislike,
    ToggleUnit,
    Refresh,
    Quit,
    Search(CityQuery),
    Nothing,
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        "" => Input::Nothing,
        "l" | "like" => Input::Like,
        "d" | "dislike" => Input::Dislike,
        "u" | "unit" => Input::ToggleUnit,
        "r" | "refresh" => Input::Refresh,
        "q" | "quit" | "exit" => Input::Quit,
        other => CityQuery::new(other).map(Input::Search).unwrap_or(Input::Nothing),
    }
}

type Finished = (SearchTicket, SearchOutcome);

fn spawn_fetch(
    provider: &Arc<OpenWeatherClient>,
    ticket: SearchTicket,
    tx: &mpsc::UnboundedSender<Finished>,
) {
    let provider = Arc::clone(provider);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = fetch_outcome(provider.as_ref(), ticket.city()).await;
        // The receiver only goes away when the loop exits.
        let _ = tx.send((ticket, outcome));
    });
}

fn redraw(session: &DashboardSession) {
    print!("\x1b[2J\x1b[H");
    print!("{}", render::dashboard(session, ForecastLayout::Cards));
    if session.is_loading() {
        println!("Fetching weather data...");
    }
    println!("\n[l]ike  [d]islike  [u]nit  [r]efresh  [q]uit  or type a city");
}

pub async fn run(
    provider: OpenWeatherClient,
    city: CityQuery,
    unit: TemperatureUnit,
    interval: Duration,
) -> Result<()> {
    let provider = Arc::new(provider);
    let mut session = DashboardSession::new(unit);
    let (tx, mut rx) = mpsc::unbounded_channel::<Finished>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK);

    spawn_fetch(&provider, session.begin_search(city), &tx);
    redraw(&session);

    loop {
        tokio::select! {
            Some((ticket, outcome)) = rx.recv() => {
                if session.apply(ticket, outcome, Utc::now()) {
                    redraw(&session);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Nothing => continue,
                    Input::Like => {
                        session.like();
                    }
                    Input::Dislike => {
                        session.dislike();
                    }
                    Input::ToggleUnit => {
                        session.toggle_unit();
                    }
                    Input::Refresh => {
                        if let Some(ticket) = session.begin_refresh() {
                            spawn_fetch(&provider, ticket, &tx);
                        }
                    }
                    Input::Search(city) => {
                        spawn_fetch(&provider, session.begin_search(city), &tx);
                    }
                }
                redraw(&session);
            }
            _ = ticker.tick() => {
                if !session.refresh_due(Utc::now(), interval) {
                    continue;
                }
                if let Some(ticket) = session.begin_refresh() {
                    tracing::debug!(city = %ticket.city(), "Auto-refresh");
                    spawn_fetch(&provider, ticket, &tx);
                }
            }
        }
    }

    Ok(())
}
