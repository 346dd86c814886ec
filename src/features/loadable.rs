//! Shared shape for remotely loaded data.

use std::fmt::Display;

/// Lifecycle of a value fetched by an effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    /// Never requested.
    Idle,
    /// A request is in flight.
    Loading,
    Loaded(T),
    /// The last request failed with this message.
    Failed(String),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Loadable::Idle
    }
}

impl<T> Loadable<T> {
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Loadable::Loaded(value),
            Err(err) => Loadable::Failed(err.to_string()),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Loadable::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(message) => Some(message),
            _ => None,
        }
    }
}
