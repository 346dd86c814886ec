//! Weather tab: current conditions for one city.

mod action;
mod reducer;
mod state;

pub use action::WeatherAction;
pub use reducer::{WeatherEnvironment, WeatherReducer, WEATHER_ID};
pub use state::WeatherState;
