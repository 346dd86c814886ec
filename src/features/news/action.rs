use std::collections::BTreeSet;

use crate::client::{Article, ClientError};
use crate::runtime::Action;

#[derive(Debug, Clone, PartialEq)]
pub enum NewsAction {
    /// The search field changed.
    QueryChanged(String),
    SearchResponse(Result<Vec<Article>, ClientError>),
    /// Handled by the app, which owns favorites.
    ToggleFavorite(String),
    FavoritesChanged(BTreeSet<String>),
}

impl Action for NewsAction {}
