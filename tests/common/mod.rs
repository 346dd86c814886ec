//! Shared test utilities and scripted collaborators.

#![allow(dead_code, unused_imports)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tabflow::app::{AppAction, AppEnvironment, AppReducer, AppState, FeatureSettings};
use tabflow::client::{
    Article, ClientError, Clients, FixtureClients, FlightClient, FlightStatus, NewsClient,
};
use tabflow::persistence::FavoritesRepository;
use tabflow::runtime::Store;

pub type AppStore = Store<AppState, AppAction>;

/// Flight client answering each call from a script of (delay, result).
///
/// Calls beyond the script return `NotFound`.
pub struct ScriptedFlights {
    script: Mutex<VecDeque<(Duration, Result<FlightStatus, ClientError>)>>,
    calls: AtomicUsize,
}

impl ScriptedFlights {
    pub fn new(script: Vec<(Duration, Result<FlightStatus, ClientError>)>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FlightClient for ScriptedFlights {
    async fn track(&self, code: &str) -> Result<FlightStatus, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();
        match next {
            Some((delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Err(ClientError::NotFound(code.to_string())),
        }
    }
}

/// News client that records every query it receives and echoes it back as
/// a single article.
#[derive(Default)]
pub struct RecordingNews {
    queries: Mutex<Vec<String>>,
}

impl RecordingNews {
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl NewsClient for RecordingNews {
    async fn search(&self, query: &str) -> Result<Vec<Article>, ClientError> {
        self.queries.lock().push(query.to_string());
        Ok(vec![Article {
            id: format!("news-{}", query),
            title: query.to_string(),
            source: "Recorder".to_string(),
            url: None,
        }])
    }
}

/// A status with only the callsign and position filled in.
pub fn flight_status(callsign: &str, latitude: f64) -> FlightStatus {
    FlightStatus {
        callsign: Some(callsign.to_string()),
        latitude: Some(latitude),
        longitude: Some(0.0),
        ..FlightStatus::default()
    }
}

/// Settings with a short search debounce for paused-clock tests.
pub fn test_settings() -> FeatureSettings {
    FeatureSettings {
        search_debounce: Duration::from_millis(300),
        flight_poll: None,
        default_city: None,
    }
}

/// Build an app store from the given collaborators, favorites already read.
pub fn app_store(clients: Clients, favorites: Arc<dyn FavoritesRepository>) -> AppStore {
    app_store_with(clients, favorites, test_settings())
}

pub fn app_store_with(
    clients: Clients,
    favorites: Arc<dyn FavoritesRepository>,
    settings: FeatureSettings,
) -> AppStore {
    let env = AppEnvironment {
        clients,
        favorites,
        settings,
    };
    AppReducer::new(env).into_store(AppState::default())
}

/// Fixture clients with the flight and news sources replaced.
pub fn clients_with(
    flights: Option<Arc<dyn FlightClient>>,
    news: Option<Arc<dyn NewsClient>>,
) -> Clients {
    let mut clients = Clients::fixtures();
    if let Some(flights) = flights {
        clients.flights = flights;
    }
    if let Some(news) = news {
        clients.news = news;
    }
    clients
}
