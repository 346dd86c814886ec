use std::sync::Arc;

use crate::client::SportsClient;
use crate::features::Loadable;
use crate::runtime::{Effect, Reducer};

use super::action::SportsAction;
use super::state::SportsState;

const LOAD_ID: &str = "sports.load";

#[derive(Clone)]
pub struct SportsEnvironment {
    pub client: Arc<dyn SportsClient>,
}

pub struct SportsReducer {
    env: SportsEnvironment,
}

impl SportsReducer {
    pub fn new(env: SportsEnvironment) -> Self {
        Self { env }
    }
}

impl Reducer for SportsReducer {
    type State = SportsState;
    type Action = SportsAction;

    fn reduce(&self, state: &mut SportsState, action: SportsAction) -> Effect<SportsAction> {
        match action {
            SportsAction::Load => {
                state.events = Loadable::Loading;
                let client = Arc::clone(&self.env.client);
                Effect::task(async move { SportsAction::EventsLoaded(client.events().await) })
                    .cancellable(LOAD_ID)
            }
            SportsAction::EventsLoaded(result) => {
                if let Err(err) = &result {
                    tracing::warn!(error = %err, "Failed to load sports events");
                }
                state.events = Loadable::from_result(result);
                Effect::none()
            }
            // Favorites are owned by the app reducer.
            SportsAction::ToggleFavorite(_) => Effect::none(),
            SportsAction::FavoritesChanged(ids) => {
                state.favorites = ids;
                Effect::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, FixtureClients, SportEvent};
    use std::collections::BTreeSet;

    fn reducer() -> SportsReducer {
        SportsReducer::new(SportsEnvironment {
            client: Arc::new(FixtureClients::new()),
        })
    }

    fn event(id: &str) -> SportEvent {
        SportEvent {
            id: id.into(),
            title: format!("Event {}", id),
            league: "Test".into(),
            starts_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn load_sets_loading_and_runs_cancellable_fetch() {
        let mut state = SportsState::default();
        let effect = reducer().reduce(&mut state, SportsAction::Load);

        assert!(state.events.is_loading());
        assert_eq!(
            format!("{:?}", effect),
            r#"Run { id: Some(EffectId("sports.load")), .. }"#
        );
    }

    #[test]
    fn failed_load_keeps_message() {
        let mut state = SportsState::default();
        reducer().reduce(
            &mut state,
            SportsAction::EventsLoaded(Err(ClientError::Timeout)),
        );
        assert_eq!(state.events.error(), Some("Request timed out"));
    }

    #[test]
    fn favorite_events_follow_favorites_mirror() {
        let mut state = SportsState::default();
        let reducer = reducer();
        reducer.reduce(
            &mut state,
            SportsAction::EventsLoaded(Ok(vec![event("sport-1"), event("sport-42")])),
        );
        assert!(state.favorite_events().is_empty());

        let ids: BTreeSet<String> = ["sport-42".to_string()].into();
        reducer.reduce(&mut state, SportsAction::FavoritesChanged(ids));

        let favorites: Vec<&str> = state.favorite_events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(favorites, vec!["sport-42"]);
        assert!(state.is_favorite("sport-42"));
    }

    #[test]
    fn toggle_is_left_to_the_app() {
        let mut state = SportsState::default();
        let effect = reducer().reduce(&mut state, SportsAction::ToggleFavorite("sport-1".into()));
        assert_eq!(state, SportsState::default());
        assert!(effect.is_none());
    }
}
