use std::collections::BTreeSet;

use crate::client::{ClientError, SportEvent};
use crate::runtime::Action;

#[derive(Debug, Clone, PartialEq)]
pub enum SportsAction {
    /// Fetch the event list.
    Load,
    EventsLoaded(Result<Vec<SportEvent>, ClientError>),
    /// Star or unstar an event. Handled by the app, which owns favorites.
    ToggleFavorite(String),
    /// The app's favorite set changed.
    FavoritesChanged(BTreeSet<String>),
}

impl Action for SportsAction {}
