//! Domain records returned by the clients.

use serde::{Deserialize, Serialize};

/// A scheduled or running sports event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportEvent {
    pub id: String,
    pub title: String,
    pub league: String,
    pub starts_at: String,
}

/// A news search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub source: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Current conditions for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub temperature_c: f64,
    pub condition: String,
    #[serde(default)]
    pub wind_kph: Option<f64>,
}

/// A rental car offer at a pickup location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarOffer {
    pub id: String,
    pub vendor: String,
    pub model: String,
    pub price_per_day: f64,
    pub location: String,
}

/// Live state of a tracked flight.
///
/// Every field is optional: telemetry feeds routinely omit or garble
/// individual values, and a partial record is still useful.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlightStatus {
    pub icao24: Option<String>,
    pub callsign: Option<String>,
    pub origin_country: Option<String>,
    pub last_contact: Option<i64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub altitude_m: Option<f64>,
    pub on_ground: Option<bool>,
    pub velocity_ms: Option<f64>,
    pub heading_deg: Option<f64>,
    pub vertical_rate_ms: Option<f64>,
}
