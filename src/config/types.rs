use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// Startup defaults for the application shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Tab selected at startup (e.g., "sports", "news").
    #[serde(default = "default_tab")]
    pub tab: String,
    /// City loaded when the weather tab first appears.
    #[serde(default)]
    pub city: Option<String>,
}

/// Timing for network-backed effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Delay before a typed search query is sent (default: 300).
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Re-poll interval for a tracked flight; 0 disables polling (default: 0).
    #[serde(default)]
    pub flight_poll_seconds: u64,
}

/// Base URLs of the data providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_flights_url")]
    pub flights: String,
    #[serde(default = "default_news_url")]
    pub news: String,
    #[serde(default = "default_weather_url")]
    pub weather: String,
    #[serde(default = "default_sports_url")]
    pub sports: String,
    #[serde(default = "default_rentals_url")]
    pub rentals: String,
}

/// Where user data is stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Favorites file; defaults to the platform data directory.
    #[serde(default)]
    pub favorites_path: Option<PathBuf>,
}

fn default_tab() -> String {
    "sports".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_flights_url() -> String {
    "https://opensky-network.org/api".to_string()
}

fn default_news_url() -> String {
    "http://127.0.0.1:8700/news".to_string()
}

fn default_weather_url() -> String {
    "http://127.0.0.1:8700/weather".to_string()
}

fn default_sports_url() -> String {
    "http://127.0.0.1:8700/sports".to_string()
}

fn default_rentals_url() -> String {
    "http://127.0.0.1:8700/rentals".to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            tab: default_tab(),
            city: None,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            search_debounce_ms: default_search_debounce_ms(),
            flight_poll_seconds: 0,
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            flights: default_flights_url(),
            news: default_news_url(),
            weather: default_weather_url(),
            sports: default_sports_url(),
            rentals: default_rentals_url(),
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn flight_poll_interval(&self) -> Option<Duration> {
        (self.flight_poll_seconds > 0).then(|| Duration::from_secs(self.flight_poll_seconds))
    }
}

impl PersistenceConfig {
    /// Favorites file path, falling back to `<data_dir>/tabflow/favorites.json`.
    pub fn favorites_path(&self) -> PathBuf {
        self.favorites_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tabflow")
                .join("favorites.json")
        })
    }
}
