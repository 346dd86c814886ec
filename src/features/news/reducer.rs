use std::sync::Arc;
use std::time::Duration;

use crate::client::NewsClient;
use crate::features::Loadable;
use crate::runtime::{Effect, Reducer};

use super::action::NewsAction;
use super::state::NewsState;

/// Cancellation id of the in-flight search.
pub const SEARCH_ID: &str = "search";

#[derive(Clone)]
pub struct NewsEnvironment {
    pub client: Arc<dyn NewsClient>,
    /// Quiet period after the last keystroke before searching.
    pub debounce: Duration,
}

pub struct NewsReducer {
    env: NewsEnvironment,
}

impl NewsReducer {
    pub fn new(env: NewsEnvironment) -> Self {
        Self { env }
    }
}

impl Reducer for NewsReducer {
    type State = NewsState;
    type Action = NewsAction;

    fn reduce(&self, state: &mut NewsState, action: NewsAction) -> Effect<NewsAction> {
        match action {
            NewsAction::QueryChanged(query) => {
                let trimmed = query.trim().to_string();
                state.query = query;

                if trimmed.is_empty() {
                    state.results = Loadable::Idle;
                    return Effect::cancel(SEARCH_ID);
                }

                state.results = Loadable::Loading;
                let client = Arc::clone(&self.env.client);
                let debounce = self.env.debounce;
                // Each keystroke supersedes the previous one, so only the
                // last query that survives the debounce hits the network.
                Effect::run(move |sender| async move {
                    tokio::time::sleep(debounce).await;
                    let result = client.search(&trimmed).await;
                    sender.send(NewsAction::SearchResponse(result));
                })
                .cancellable(SEARCH_ID)
            }
            NewsAction::SearchResponse(result) => {
                if let Err(err) = &result {
                    tracing::warn!(query = %state.query, error = %err, "News search failed");
                }
                state.results = Loadable::from_result(result);
                Effect::none()
            }
            NewsAction::ToggleFavorite(_) => Effect::none(),
            NewsAction::FavoritesChanged(ids) => {
                state.favorites = ids;
                Effect::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Article, FixtureClients};

    fn reducer() -> NewsReducer {
        NewsReducer::new(NewsEnvironment {
            client: Arc::new(FixtureClients::new()),
            debounce: Duration::from_millis(300),
        })
    }

    #[test]
    fn query_starts_debounced_search() {
        let mut state = NewsState::default();
        let effect = reducer().reduce(&mut state, NewsAction::QueryChanged("rust".into()));

        assert_eq!(state.query, "rust");
        assert!(state.results.is_loading());
        assert_eq!(
            format!("{:?}", effect),
            r#"Run { id: Some(EffectId("search")), .. }"#
        );
    }

    #[test]
    fn blank_query_clears_and_cancels() {
        let mut state = NewsState {
            query: "ru".into(),
            results: Loadable::Loading,
            ..NewsState::default()
        };
        let effect = reducer().reduce(&mut state, NewsAction::QueryChanged("  ".into()));

        assert!(state.results.is_idle());
        assert!(matches!(effect, Effect::Cancel(id) if id.as_str() == SEARCH_ID));
    }

    #[test]
    fn response_fills_results() {
        let mut state = NewsState::default();
        let article = Article {
            id: "news-1".into(),
            title: "Rust".into(),
            source: "Desk".into(),
            url: None,
        };
        reducer().reduce(
            &mut state,
            NewsAction::SearchResponse(Ok(vec![article.clone()])),
        );
        assert_eq!(state.results.value(), Some(&vec![article]));
        assert!(state.favorite_articles().is_empty());
    }
}
