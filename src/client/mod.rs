//! Network collaborators of the features.
//!
//! Each data source is an async trait so reducers can be wired to the live
//! HTTP implementation, to the offline fixtures, or to scripted doubles in
//! tests. Clients are only ever called from inside effect operations.

mod error;
mod fixture;
mod http;
pub mod telemetry;
mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;

pub use error::ClientError;
pub use fixture::FixtureClients;
pub use http::HttpClients;
pub use types::{Article, CarOffer, FlightStatus, SportEvent, WeatherReport};

#[async_trait]
pub trait FlightClient: Send + Sync {
    /// Current status of the flight with this callsign.
    async fn track(&self, code: &str) -> Result<FlightStatus, ClientError>;
}

#[async_trait]
pub trait NewsClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Article>, ClientError>;
}

#[async_trait]
pub trait WeatherClient: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReport, ClientError>;
}

#[async_trait]
pub trait SportsClient: Send + Sync {
    async fn events(&self) -> Result<Vec<SportEvent>, ClientError>;
}

#[async_trait]
pub trait RentalClient: Send + Sync {
    async fn offers(&self, location: &str) -> Result<Vec<CarOffer>, ClientError>;
}

/// One client per data source, shared by the feature environments.
#[derive(Clone)]
pub struct Clients {
    pub flights: Arc<dyn FlightClient>,
    pub news: Arc<dyn NewsClient>,
    pub weather: Arc<dyn WeatherClient>,
    pub sports: Arc<dyn SportsClient>,
    pub rentals: Arc<dyn RentalClient>,
}

impl Clients {
    /// Live clients talking to the configured endpoints.
    pub fn http(config: &Config) -> Result<Self, ClientError> {
        let http = Arc::new(HttpClients::new(&config.network, &config.endpoints)?);
        Ok(Self::from_shared(http))
    }

    /// Canned in-memory data, no network access.
    pub fn fixtures() -> Self {
        Self::from_shared(Arc::new(FixtureClients::new()))
    }

    fn from_shared<C>(client: Arc<C>) -> Self
    where
        C: FlightClient + NewsClient + WeatherClient + SportsClient + RentalClient + 'static,
    {
        Self {
            flights: client.clone(),
            news: client.clone(),
            weather: client.clone(),
            sports: client.clone(),
            rentals: client,
        }
    }
}
