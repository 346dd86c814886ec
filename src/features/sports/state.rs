use std::collections::BTreeSet;

use crate::client::SportEvent;
use crate::features::Loadable;
use crate::runtime::FeatureState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SportsState {
    pub events: Loadable<Vec<SportEvent>>,
    /// Mirror of the app's favorite ids.
    pub favorites: BTreeSet<String>,
}

impl FeatureState for SportsState {}

impl SportsState {
    /// Loaded events whose id is a favorite, in list order.
    pub fn favorite_events(&self) -> Vec<&SportEvent> {
        self.events
            .value()
            .map(|events| {
                events
                    .iter()
                    .filter(|e| self.favorites.contains(&e.id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }
}
