use crate::client::FlightStatus;
use crate::runtime::FeatureState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlightsState {
    /// Callsign being tracked.
    pub tracking: Option<String>,
    pub flight_status: Option<FlightStatus>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl FeatureState for FlightsState {}
