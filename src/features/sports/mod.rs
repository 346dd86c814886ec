//! Sports tab: upcoming events and the user's favorite ones.

mod action;
mod reducer;
mod state;

pub use action::SportsAction;
pub use reducer::{SportsEnvironment, SportsReducer};
pub use state::SportsState;
