use crate::client::{ClientError, WeatherReport};
use crate::runtime::Action;

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherAction {
    /// Fetch current conditions for a city.
    Refresh(String),
    WeatherResponse(Result<WeatherReport, ClientError>),
}

impl Action for WeatherAction {}
