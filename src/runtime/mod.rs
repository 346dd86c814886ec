//! Unidirectional state runtime.
//!
//! This module provides the store, reducer composition and effect
//! execution that every feature of the application is built on.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Store::send ──→ Reducer ──→ State ──→ Observers
//!    ↑                          │
//!    │                          ↓
//!    └──────────────────── Effect (async task)
//! ```
//!
//! - **State**: value tree owned by the root store
//! - **Action**: user input, lifecycle notices and effect results
//! - **Reducer**: pure `(&mut State, Action) -> Effect`
//! - **Effect**: described work, run by the store after the state commit
//! - **Scope**: a child store focused on one slice of state and actions

mod action;
mod cancellation;
mod effect;
mod reducer;
mod scope;
mod state;
mod store;

pub use action::Action;
pub use cancellation::{CancellationRegistry, ScopeId};
pub use effect::{Effect, EffectId, Operation, Sender};
pub use reducer::{CasePath, Combine, Lens, Reducer, ReducerExt, Scope};
pub use state::FeatureState;
pub use store::{Store, Subscription};
