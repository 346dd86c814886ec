//! Flights tab: live tracking of a single flight.

mod action;
mod reducer;
mod state;

pub use action::FlightsAction;
pub use reducer::{FlightsEnvironment, FlightsReducer, TRACK_ID};
pub use state::FlightsState;
