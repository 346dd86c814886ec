//! Rentals tab: car offers at a pickup location.

mod action;
mod reducer;
mod state;

pub use action::RentalsAction;
pub use reducer::{RentalsEnvironment, RentalsReducer, RENTALS_ID};
pub use state::RentalsState;
