use crate::client::{ClientError, FlightStatus};
use crate::runtime::Action;

#[derive(Debug, Clone, PartialEq)]
pub enum FlightsAction {
    /// Start tracking the flight with this callsign, replacing any other.
    TrackFlight(String),
    FlightResponse(Result<FlightStatus, ClientError>),
    StopTracking,
}

impl Action for FlightsAction {}
