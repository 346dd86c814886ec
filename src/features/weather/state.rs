use crate::client::WeatherReport;
use crate::features::Loadable;
use crate::runtime::FeatureState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherState {
    pub city: Option<String>,
    pub report: Loadable<WeatherReport>,
}

impl FeatureState for WeatherState {}
