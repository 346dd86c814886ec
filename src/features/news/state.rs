use std::collections::BTreeSet;

use crate::client::Article;
use crate::features::Loadable;
use crate::runtime::FeatureState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewsState {
    pub query: String,
    pub results: Loadable<Vec<Article>>,
    /// Mirror of the app's favorite ids.
    pub favorites: BTreeSet<String>,
}

impl FeatureState for NewsState {}

impl NewsState {
    /// Search hits the user starred.
    pub fn favorite_articles(&self) -> Vec<&Article> {
        self.results
            .value()
            .map(|articles| {
                articles
                    .iter()
                    .filter(|a| self.favorites.contains(&a.id))
                    .collect()
            })
            .unwrap_or_default()
    }
}
