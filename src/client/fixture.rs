//! Offline clients serving canned data.

use async_trait::async_trait;

use super::error::ClientError;
use super::types::{Article, CarOffer, FlightStatus, SportEvent, WeatherReport};
use super::{FlightClient, NewsClient, RentalClient, SportsClient, WeatherClient};

/// In-memory data source used by `--offline` and in tests.
#[derive(Debug, Clone)]
pub struct FixtureClients {
    events: Vec<SportEvent>,
    articles: Vec<Article>,
    flights: Vec<FlightStatus>,
    weather: Vec<WeatherReport>,
    offers: Vec<CarOffer>,
}

impl Default for FixtureClients {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureClients {
    pub fn new() -> Self {
        Self {
            events: vec![
                event("sport-7", "Lakers vs Celtics", "NBA", "2026-10-20T19:30:00Z"),
                event("sport-42", "Arsenal vs Chelsea", "Premier League", "2026-10-21T14:00:00Z"),
                event("sport-99", "Yankees vs Red Sox", "MLB", "2026-10-22T23:05:00Z"),
            ],
            articles: vec![
                article("news-1", "Rust 2026 edition lands", "The Changelog"),
                article("news-2", "Airlines expand transatlantic routes", "Skyward"),
                article("news-3", "Storm season outlook", "Weather Desk"),
                article("news-4", "Electric rental fleets double", "Mobility Today"),
            ],
            flights: vec![
                flight("a0b1c2", "UA123", "United States", 41.97, -87.9, 10668.0),
                flight("3c6444", "LH400", "Germany", 50.03, 8.57, 11277.0),
            ],
            weather: vec![
                weather("Berlin", 12.5, "Overcast", 14.0),
                weather("Chicago", 8.0, "Windy", 32.0),
                weather("Lisbon", 21.0, "Sunny", 9.0),
            ],
            offers: vec![
                offer("car-1", "Sixt", "VW Golf", 39.0, "Berlin"),
                offer("car-2", "Hertz", "Tesla Model 3", 79.0, "Berlin"),
                offer("car-3", "Avis", "Ford Focus", 45.0, "Chicago"),
            ],
        }
    }
}

fn event(id: &str, title: &str, league: &str, starts_at: &str) -> SportEvent {
    SportEvent {
        id: id.into(),
        title: title.into(),
        league: league.into(),
        starts_at: starts_at.into(),
    }
}

fn article(id: &str, title: &str, source: &str) -> Article {
    Article {
        id: id.into(),
        title: title.into(),
        source: source.into(),
        url: None,
    }
}

fn flight(icao24: &str, callsign: &str, country: &str, lat: f64, lon: f64, alt: f64) -> FlightStatus {
    FlightStatus {
        icao24: Some(icao24.into()),
        callsign: Some(callsign.into()),
        origin_country: Some(country.into()),
        latitude: Some(lat),
        longitude: Some(lon),
        altitude_m: Some(alt),
        on_ground: Some(false),
        ..FlightStatus::default()
    }
}

fn weather(city: &str, temperature_c: f64, condition: &str, wind_kph: f64) -> WeatherReport {
    WeatherReport {
        city: city.into(),
        temperature_c,
        condition: condition.into(),
        wind_kph: Some(wind_kph),
    }
}

fn offer(id: &str, vendor: &str, model: &str, price_per_day: f64, location: &str) -> CarOffer {
    CarOffer {
        id: id.into(),
        vendor: vendor.into(),
        model: model.into(),
        price_per_day,
        location: location.into(),
    }
}

#[async_trait]
impl FlightClient for FixtureClients {
    async fn track(&self, code: &str) -> Result<FlightStatus, ClientError> {
        self.flights
            .iter()
            .find(|f| {
                f.callsign
                    .as_deref()
                    .is_some_and(|cs| cs.eq_ignore_ascii_case(code.trim()))
            })
            .cloned()
            .ok_or_else(|| ClientError::NotFound(code.to_string()))
    }
}

#[async_trait]
impl NewsClient for FixtureClients {
    async fn search(&self, query: &str) -> Result<Vec<Article>, ClientError> {
        let needle = query.to_lowercase();
        Ok(self
            .articles
            .iter()
            .filter(|a| a.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WeatherClient for FixtureClients {
    async fn current(&self, city: &str) -> Result<WeatherReport, ClientError> {
        self.weather
            .iter()
            .find(|w| w.city.eq_ignore_ascii_case(city.trim()))
            .cloned()
            .ok_or_else(|| ClientError::NotFound(city.to_string()))
    }
}

#[async_trait]
impl SportsClient for FixtureClients {
    async fn events(&self) -> Result<Vec<SportEvent>, ClientError> {
        Ok(self.events.clone())
    }
}

#[async_trait]
impl RentalClient for FixtureClients {
    async fn offers(&self, location: &str) -> Result<Vec<CarOffer>, ClientError> {
        Ok(self
            .offers
            .iter()
            .filter(|o| o.location.eq_ignore_ascii_case(location.trim()))
            .cloned()
            .collect())
    }
}
