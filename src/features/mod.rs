//! Tab features.
//!
//! Each feature follows the same layout:
//! - `state.rs` - the slice of `AppState` it owns
//! - `action.rs` - user and effect actions
//! - `reducer.rs` - state transitions and effect descriptions
//!
//! Features never see each other's actions; the app reducer composes them
//! and carries anything shared (favorites) across explicitly.

pub mod flights;
pub mod loadable;
pub mod news;
pub mod rentals;
pub mod sports;
pub mod weather;

pub use loadable::Loadable;
