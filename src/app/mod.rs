//! Root of the application state tree.
//!
//! `AppReducer` embeds every tab feature through a `Scope` and owns the
//! state that crosses tabs: the selected tab and the favorite ids.

mod action;
mod reducer;
mod state;

pub use action::AppAction;
pub use reducer::{AppEnvironment, AppReducer, FeatureSettings, SAVE_FAVORITES_ID};
pub use state::{AppState, Tab, UnknownTab};
