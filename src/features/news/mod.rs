//! News tab: debounced article search.

mod action;
mod reducer;
mod state;

pub use action::NewsAction;
pub use reducer::{NewsEnvironment, NewsReducer, SEARCH_ID};
pub use state::NewsState;
