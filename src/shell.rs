//! Line-oriented front end.
//!
//! Reads commands, turns them into actions on scoped stores and prints a
//! status line whenever the state changes. It never touches state directly.

use std::fmt::Write as _;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::app::{AppAction, AppState, Tab, UnknownTab};
use crate::features::flights::{FlightsAction, FlightsState};
use crate::features::news::{NewsAction, NewsState};
use crate::features::rentals::{RentalsAction, RentalsState};
use crate::features::sports::{SportsAction, SportsState};
use crate::features::weather::{WeatherAction, WeatherState};
use crate::features::Loadable;
use crate::runtime::Store;

pub const HELP: &str = "\
commands:
  tab <sports|news|flights|weather|rentals>
  fav <id>          toggle a favorite
  sports            reload events
  search <query>    search news (empty query clears)
  track <code>      track a flight
  untrack           stop tracking
  weather <city>    current conditions
  rent <location>   car offers
  pick <offer-id>   select a rental offer
  state             print the full state
  help
  quit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tab(Tab),
    Favorite(String),
    Sports,
    Search(String),
    Track(String),
    Untrack,
    Weather(String),
    Rent(String),
    Pick(String),
    State,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Tab(#[from] UnknownTab),
}

/// Parse one line; blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let required = |name: &'static str| {
        if rest.is_empty() {
            Err(CommandError::MissingArgument(name))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "tab" => Command::Tab(required("tab")?.parse()?),
        "fav" => Command::Favorite(required("fav")?),
        "sports" => Command::Sports,
        "search" => Command::Search(rest.to_string()),
        "track" => Command::Track(required("track")?),
        "untrack" => Command::Untrack,
        "weather" => Command::Weather(required("weather")?),
        "rent" => Command::Rent(required("rent")?),
        "pick" => Command::Pick(required("pick")?),
        "state" => Command::State,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn loadable_summary<T>(value: &Loadable<T>, describe: impl FnOnce(&T) -> String) -> String {
    match value {
        Loadable::Idle => "idle".to_string(),
        Loadable::Loading => "loading...".to_string(),
        Loadable::Loaded(value) => describe(value),
        Loadable::Failed(message) => format!("error: {}", message),
    }
}

/// One line describing the selected tab.
pub fn render_status(state: &AppState) -> String {
    let detail = match state.selected_tab {
        Tab::Sports => loadable_summary(&state.sports.events, |events| {
            format!(
                "{} events, {} favorite",
                events.len(),
                state.sports.favorite_events().len()
            )
        }),
        Tab::News => {
            let results = loadable_summary(&state.news.results, |articles| {
                format!("{} articles", articles.len())
            });
            if state.news.query.is_empty() {
                results
            } else {
                format!("'{}': {}", state.news.query, results)
            }
        }
        Tab::Flights => match (&state.flights.tracking, &state.flights.flight_status) {
            (None, _) => "not tracking".to_string(),
            (Some(code), _) if state.flights.is_loading => format!("{}: loading...", code),
            (Some(code), _) if state.flights.error.is_some() => format!(
                "{}: error: {}",
                code,
                state.flights.error.as_deref().unwrap_or_default()
            ),
            (Some(code), Some(status)) => format!(
                "{}: {}",
                code,
                match (status.latitude, status.longitude) {
                    (Some(lat), Some(lon)) => format!("at {:.2}, {:.2}", lat, lon),
                    _ => "position unknown".to_string(),
                }
            ),
            (Some(code), None) => format!("{}: no data", code),
        },
        Tab::Weather => loadable_summary(&state.weather.report, |report| {
            format!(
                "{}: {:.1}°C, {}",
                report.city, report.temperature_c, report.condition
            )
        }),
        Tab::Rentals => loadable_summary(&state.rentals.offers, |offers| {
            match state.rentals.selected() {
                Some(offer) => format!("{} offers, selected {}", offers.len(), offer.model),
                None => format!("{} offers", offers.len()),
            }
        }),
    };

    let mut line = format!("[{}] {}", state.selected_tab, detail);
    if let Some(err) = &state.favorites_error {
        let _ = write!(line, " (favorites: {})", err);
    }
    line
}

/// Multi-line dump of every tab.
pub fn render_state(state: &AppState) -> String {
    let mut out = String::new();
    let favorites: Vec<&str> = state.favorite_ids.iter().map(String::as_str).collect();
    let _ = writeln!(out, "tab: {}", state.selected_tab);
    let _ = writeln!(out, "favorites: [{}]", favorites.join(", "));

    let _ = writeln!(out, "sports:");
    if let Some(events) = state.sports.events.value() {
        for event in events {
            let star = if state.sports.is_favorite(&event.id) { "*" } else { " " };
            let _ = writeln!(out, "  {} {:<10} {} ({})", star, event.id, event.title, event.league);
        }
    }

    let _ = writeln!(out, "news: '{}'", state.news.query);
    if let Some(articles) = state.news.results.value() {
        for article in articles {
            let star = if state.news.favorites.contains(&article.id) { "*" } else { " " };
            let _ = writeln!(out, "  {} {:<10} {} - {}", star, article.id, article.title, article.source);
        }
    }

    let _ = writeln!(
        out,
        "flights: {}",
        state.flights.tracking.as_deref().unwrap_or("-")
    );
    if let Some(status) = &state.flights.flight_status {
        let _ = writeln!(
            out,
            "  country={} alt={:?} speed={:?} heading={:?} on_ground={:?}",
            status.origin_country.as_deref().unwrap_or("?"),
            status.altitude_m,
            status.velocity_ms,
            status.heading_deg,
            status.on_ground
        );
    }

    let _ = writeln!(
        out,
        "weather: {}",
        loadable_summary(&state.weather.report, |r| format!(
            "{} {:.1}°C {}",
            r.city, r.temperature_c, r.condition
        ))
    );

    let _ = writeln!(out, "rentals: {}", state.rentals.location.as_deref().unwrap_or("-"));
    if let Some(offers) = state.rentals.offers.value() {
        for offer in offers {
            let mark = if state.rentals.selected_offer.as_deref() == Some(offer.id.as_str()) {
                ">"
            } else {
                " "
            };
            let _ = writeln!(
                out,
                "  {} {:<6} {} {} {:.2}/day",
                mark, offer.id, offer.vendor, offer.model, offer.price_per_day
            );
        }
    }
    out
}

/// Whether the read loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Front end bound to one store.
///
/// Each tab is driven through its own scoped store, kept for the life of the
/// shell so effects started through it are not cancelled early.
pub struct Shell {
    store: Store<AppState, AppAction>,
    sports: Store<SportsState, SportsAction>,
    news: Store<NewsState, NewsAction>,
    flights: Store<FlightsState, FlightsAction>,
    weather: Store<WeatherState, WeatherAction>,
    rentals: Store<RentalsState, RentalsAction>,
}

impl Shell {
    pub fn new(store: Store<AppState, AppAction>) -> Self {
        Self {
            sports: store.scope(|s: &AppState| &s.sports, AppAction::Sports),
            news: store.scope(|s: &AppState| &s.news, AppAction::News),
            flights: store.scope(|s: &AppState| &s.flights, AppAction::Flights),
            weather: store.scope(|s: &AppState| &s.weather, AppAction::Weather),
            rentals: store.scope(|s: &AppState| &s.rentals, AppAction::Rentals),
            store,
        }
    }

    pub fn store(&self) -> &Store<AppState, AppAction> {
        &self.store
    }

    /// Send the actions for `command`. Output-only commands are no-ops here.
    pub fn execute(&self, command: Command) -> Flow {
        match command {
            Command::Tab(tab) => self.store.send(AppAction::SelectTab(tab)),
            Command::Favorite(id) => self.store.send(AppAction::ToggleFavorite(id)),
            Command::Sports => self.sports.send(SportsAction::Load),
            Command::Search(query) => self.news.send(NewsAction::QueryChanged(query)),
            Command::Track(code) => self.flights.send(FlightsAction::TrackFlight(code)),
            Command::Untrack => self.flights.send(FlightsAction::StopTracking),
            Command::Weather(city) => self.weather.send(WeatherAction::Refresh(city)),
            Command::Rent(location) => self.rentals.send(RentalsAction::Search(location)),
            Command::Pick(id) => self.rentals.send(RentalsAction::SelectOffer(id)),
            Command::State | Command::Help => {}
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Read commands from `input` until EOF or `quit`, writing status to
    /// `output`. Pending effects are awaited before returning on EOF.
    pub async fn run<R, W>(self, input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _subscription = self.store.observe(move |state| {
            let _ = tx.send(render_status(state));
        });

        self.store.send(AppAction::OnAppear);

        let mut lines = input.lines();
        let mut last_status = String::new();
        loop {
            tokio::select! {
                Some(status) = rx.recv() => {
                    if status != last_status {
                        output.write_all(status.as_bytes()).await?;
                        output.write_all(b"\n").await?;
                        output.flush().await?;
                        last_status = status;
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        tracing::debug!("input closed");
                        // Polling would keep the effect queue busy forever.
                        if self.flights.with_state(|f| f.tracking.is_some()) {
                            self.flights.send(FlightsAction::StopTracking);
                        }
                        self.store.wait_for_effects().await;
                        break;
                    };
                    let command = match parse_command(&line) {
                        Ok(Some(command)) => command,
                        Ok(None) => continue,
                        Err(err) => {
                            output.write_all(format!("{}\n", err).as_bytes()).await?;
                            continue;
                        }
                    };
                    match &command {
                        Command::Help => output.write_all(format!("{}\n", HELP).as_bytes()).await?,
                        Command::State => {
                            let dump = self.store.with_state(render_state);
                            output.write_all(dump.as_bytes()).await?;
                        }
                        _ => {}
                    }
                    if self.execute(command) == Flow::Quit {
                        break;
                    }
                }
            }
        }

        // Flush whatever the last reductions produced.
        while let Ok(status) = rx.try_recv() {
            if status != last_status {
                output.write_all(status.as_bytes()).await?;
                output.write_all(b"\n").await?;
                last_status = status;
            }
        }
        output.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{SportEvent, WeatherReport};

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse_command("tab News"), Ok(Some(Command::Tab(Tab::News))));
        assert_eq!(
            parse_command("  search  rust lang "),
            Ok(Some(Command::Search("rust lang".into())))
        );
        assert_eq!(parse_command("search"), Ok(Some(Command::Search(String::new()))));
        assert_eq!(parse_command("QUIT"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_command("fly"), Err(CommandError::Unknown("fly".into())));
        assert_eq!(
            parse_command("track"),
            Err(CommandError::MissingArgument("track"))
        );
        assert_eq!(
            parse_command("tab cinema"),
            Err(CommandError::Tab(UnknownTab("cinema".into())))
        );
    }

    #[test]
    fn status_describes_selected_tab() {
        let mut state = AppState::default();
        assert_eq!(render_status(&state), "[sports] idle");

        state.sports.events = Loadable::Loaded(vec![SportEvent {
            id: "sport-42".into(),
            title: "Derby".into(),
            league: "PL".into(),
            starts_at: "now".into(),
        }]);
        state.sports.favorites.insert("sport-42".into());
        assert_eq!(render_status(&state), "[sports] 1 events, 1 favorite");

        state.selected_tab = Tab::Weather;
        state.weather.report = Loadable::Loaded(WeatherReport {
            city: "Berlin".into(),
            temperature_c: 12.5,
            condition: "Overcast".into(),
            wind_kph: None,
        });
        assert_eq!(render_status(&state), "[weather] Berlin: 12.5°C, Overcast");
    }

    #[test]
    fn status_mentions_favorites_failure() {
        let state = AppState {
            selected_tab: Tab::Flights,
            favorites_error: Some("disk full".into()),
            ..AppState::default()
        };
        assert_eq!(
            render_status(&state),
            "[flights] not tracking (favorites: disk full)"
        );
    }

    #[test]
    fn state_dump_marks_favorites() {
        let mut state = AppState::default();
        state.favorite_ids.insert("sport-42".into());
        state.sports.favorites.insert("sport-42".into());
        state.sports.events = Loadable::Loaded(vec![SportEvent {
            id: "sport-42".into(),
            title: "Derby".into(),
            league: "PL".into(),
            starts_at: "now".into(),
        }]);

        let dump = render_state(&state);
        assert!(dump.contains("favorites: [sport-42]"));
        assert!(dump.contains("* sport-42"));
    }
}
