use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::features::flights::FlightsState;
use crate::features::news::NewsState;
use crate::features::rentals::RentalsState;
use crate::features::sports::SportsState;
use crate::features::weather::WeatherState;
use crate::runtime::FeatureState;

/// Top-level tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Sports,
    News,
    Flights,
    Weather,
    Rentals,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Sports, Tab::News, Tab::Flights, Tab::Weather, Tab::Rentals];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Sports => "sports",
            Tab::News => "news",
            Tab::Flights => "flights",
            Tab::Weather => "weather",
            Tab::Rentals => "rentals",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tab '{0}'")]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTab(wanted.to_string()))
    }
}

/// The whole application state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub selected_tab: Tab,
    /// Single source of truth for favorites; feature slices hold mirrors.
    pub favorite_ids: BTreeSet<String>,
    /// Last load or save failure.
    pub favorites_error: Option<String>,
    /// Set by the first `OnAppear`.
    pub appeared: bool,
    /// A read of the persisted favorites is in flight.
    pub favorites_requested: bool,
    /// Persisted favorites have been read (or failed to).
    pub favorites_loaded: bool,
    /// Toggles made before the persisted favorites were read.
    pub pending_toggles: BTreeSet<String>,
    pub sports: SportsState,
    pub news: NewsState,
    pub flights: FlightsState,
    pub weather: WeatherState,
    pub rentals: RentalsState,
}

impl FeatureState for AppState {}

impl AppState {
    pub fn with_tab(tab: Tab) -> Self {
        Self {
            selected_tab: tab,
            ..Self::default()
        }
    }
}
