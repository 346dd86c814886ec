use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::client::Clients;
use crate::config::Config;
use crate::features::flights::{FlightsEnvironment, FlightsReducer};
use crate::features::news::{NewsAction, NewsEnvironment, NewsReducer};
use crate::features::rentals::{RentalsEnvironment, RentalsReducer};
use crate::features::sports::{SportsAction, SportsEnvironment, SportsReducer};
use crate::features::weather::{WeatherAction, WeatherEnvironment, WeatherReducer};
use crate::persistence::{FavoritesRepository, PersistenceError};
use crate::runtime::{CasePath, Effect, Lens, Reducer, Scope, Store};

use super::action::AppAction;
use super::state::{AppState, Tab};

/// Cancellation id of the pending favorites write.
pub const SAVE_FAVORITES_ID: &str = "favorites.save";
const LOAD_FAVORITES_ID: &str = "favorites.load";

/// Tunables the features read from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSettings {
    pub search_debounce: Duration,
    pub flight_poll: Option<Duration>,
    /// City fetched the first time the weather tab is shown.
    pub default_city: Option<String>,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl FeatureSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            search_debounce: config.network.search_debounce(),
            flight_poll: config.network.flight_poll_interval(),
            default_city: config.defaults.city.clone(),
        }
    }
}

/// Everything the app's effects talk to.
#[derive(Clone)]
pub struct AppEnvironment {
    pub clients: Clients,
    pub favorites: Arc<dyn FavoritesRepository>,
    pub settings: FeatureSettings,
}

pub struct AppReducer {
    sports: Scope<SportsReducer, AppState, AppAction>,
    news: Scope<NewsReducer, AppState, AppAction>,
    flights: Scope<FlightsReducer, AppState, AppAction>,
    weather: Scope<WeatherReducer, AppState, AppAction>,
    rentals: Scope<RentalsReducer, AppState, AppAction>,
    favorites: Arc<dyn FavoritesRepository>,
    /// Serializes writes on the blocking pool.
    save_lock: Arc<Mutex<()>>,
    default_city: Option<String>,
}

impl AppReducer {
    pub fn new(env: AppEnvironment) -> Self {
        let AppEnvironment {
            clients,
            favorites,
            settings,
        } = env;

        Self {
            sports: Scope::new(
                SportsReducer::new(SportsEnvironment {
                    client: clients.sports,
                }),
                Lens::new(
                    |s: &AppState| &s.sports,
                    |s: &mut AppState| &mut s.sports,
                ),
                CasePath::new(
                    |a: AppAction| match a {
                        AppAction::Sports(a) => Some(a),
                        _ => None,
                    },
                    AppAction::Sports,
                ),
            ),
            news: Scope::new(
                NewsReducer::new(NewsEnvironment {
                    client: clients.news,
                    debounce: settings.search_debounce,
                }),
                Lens::new(
                    |s: &AppState| &s.news,
                    |s: &mut AppState| &mut s.news,
                ),
                CasePath::new(
                    |a: AppAction| match a {
                        AppAction::News(a) => Some(a),
                        _ => None,
                    },
                    AppAction::News,
                ),
            ),
            flights: Scope::new(
                FlightsReducer::new(FlightsEnvironment {
                    client: clients.flights,
                    poll_interval: settings.flight_poll,
                }),
                Lens::new(
                    |s: &AppState| &s.flights,
                    |s: &mut AppState| &mut s.flights,
                ),
                CasePath::new(
                    |a: AppAction| match a {
                        AppAction::Flights(a) => Some(a),
                        _ => None,
                    },
                    AppAction::Flights,
                ),
            ),
            weather: Scope::new(
                WeatherReducer::new(WeatherEnvironment {
                    client: clients.weather,
                }),
                Lens::new(
                    |s: &AppState| &s.weather,
                    |s: &mut AppState| &mut s.weather,
                ),
                CasePath::new(
                    |a: AppAction| match a {
                        AppAction::Weather(a) => Some(a),
                        _ => None,
                    },
                    AppAction::Weather,
                ),
            ),
            rentals: Scope::new(
                RentalsReducer::new(RentalsEnvironment {
                    client: clients.rentals,
                }),
                Lens::new(
                    |s: &AppState| &s.rentals,
                    |s: &mut AppState| &mut s.rentals,
                ),
                CasePath::new(
                    |a: AppAction| match a {
                        AppAction::Rentals(a) => Some(a),
                        _ => None,
                    },
                    AppAction::Rentals,
                ),
            ),
            favorites,
            save_lock: Arc::new(Mutex::new(())),
            default_city: settings.default_city,
        }
    }

    /// Create the root store with persisted favorites already applied.
    ///
    /// The repository is read before the store exists; a failed read is
    /// recorded in `favorites_error` and leaves the set empty.
    pub fn into_store(self, initial: AppState) -> Store<AppState, AppAction> {
        let loaded = self.favorites.load();
        let store = Store::new(initial, self);
        store.send(AppAction::FavoritesLoaded(loaded));
        store
    }

    /// First fetch for a tab whose data was never requested.
    fn lazy_load(&self, state: &mut AppState, tab: Tab) -> Effect<AppAction> {
        match tab {
            Tab::Sports if state.sports.events.is_idle() => {
                self.sports.reduce(state, AppAction::Sports(SportsAction::Load))
            }
            Tab::Weather if state.weather.report.is_idle() => match &self.default_city {
                Some(city) => self.weather.reduce(
                    state,
                    AppAction::Weather(WeatherAction::Refresh(city.clone())),
                ),
                None => Effect::none(),
            },
            _ => Effect::none(),
        }
    }

    fn toggle_favorite(&self, state: &mut AppState, id: String) -> Effect<AppAction> {
        let id = id.trim().to_string();
        if id.is_empty() {
            return Effect::none();
        }
        toggle(&mut state.favorite_ids, id.clone());

        // Writing now would replace what is persisted with a partial set;
        // the toggle is replayed onto the loaded set instead.
        if !state.favorites_loaded {
            toggle(&mut state.pending_toggles, id);
            return Effect::merge([self.broadcast_favorites(state), self.request_favorites(state)]);
        }

        let ids: Vec<String> = state.favorite_ids.iter().cloned().collect();
        Effect::merge([self.broadcast_favorites(state), self.save_favorites(ids)])
    }

    fn favorites_loaded(&self, state: &mut AppState, ids: Vec<String>) -> Effect<AppAction> {
        let mut loaded: BTreeSet<String> = ids.into_iter().collect();
        let replayed = std::mem::take(&mut state.pending_toggles);
        let dirty = !replayed.is_empty();
        for id in replayed {
            toggle(&mut loaded, id);
        }

        tracing::info!(count = loaded.len(), replayed = dirty, "Loaded favorites");
        state.favorite_ids = loaded;
        state.favorites_requested = false;
        state.favorites_loaded = true;
        state.favorites_error = None;

        let save = if dirty {
            self.save_favorites(state.favorite_ids.iter().cloned().collect())
        } else {
            Effect::none()
        };
        Effect::merge([self.broadcast_favorites(state), save])
    }

    /// Push the favorite set into every feature that mirrors it.
    fn broadcast_favorites(&self, state: &mut AppState) -> Effect<AppAction> {
        let ids = state.favorite_ids.clone();
        Effect::merge([
            self.sports.reduce(
                state,
                AppAction::Sports(SportsAction::FavoritesChanged(ids.clone())),
            ),
            self.news
                .reduce(state, AppAction::News(NewsAction::FavoritesChanged(ids))),
        ])
    }

    /// Start reading persisted favorites unless they were read or are being read.
    fn request_favorites(&self, state: &mut AppState) -> Effect<AppAction> {
        if state.favorites_loaded || state.favorites_requested {
            return Effect::none();
        }
        state.favorites_requested = true;
        self.load_favorites()
    }

    fn load_favorites(&self) -> Effect<AppAction> {
        let repo = Arc::clone(&self.favorites);
        Effect::task(async move {
            let result = tokio::task::spawn_blocking(move || repo.load())
                .await
                .unwrap_or_else(|e| Err(PersistenceError::Interrupted(e.to_string())));
            AppAction::FavoritesLoaded(result)
        })
        .cancellable(LOAD_FAVORITES_ID)
    }

    /// Write `ids`, superseding any write still waiting to run.
    ///
    /// The blocking closure re-checks cancellation under the lock, so an
    /// older list is never written after a newer one.
    fn save_favorites(&self, ids: Vec<String>) -> Effect<AppAction> {
        let repo = Arc::clone(&self.favorites);
        let lock = Arc::clone(&self.save_lock);
        Effect::run(move |sender| async move {
            let guard_sender = sender.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                let _guard = lock.lock();
                if guard_sender.is_cancelled() {
                    return None;
                }
                Some(repo.save(&ids))
            })
            .await;

            match outcome {
                Ok(Some(result)) => sender.send(AppAction::FavoritesSaved(result)),
                Ok(None) => tracing::trace!("favorites write superseded"),
                Err(e) => sender.send(AppAction::FavoritesSaved(Err(
                    PersistenceError::Interrupted(e.to_string()),
                ))),
            }
        })
        .cancellable(SAVE_FAVORITES_ID)
    }
}

fn toggle(set: &mut BTreeSet<String>, id: String) {
    if !set.remove(&id) {
        set.insert(id);
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;

    fn reduce(&self, state: &mut AppState, action: AppAction) -> Effect<AppAction> {
        match action {
            AppAction::OnAppear => {
                if state.appeared {
                    return Effect::none();
                }
                state.appeared = true;
                let tab = state.selected_tab;
                Effect::merge([self.request_favorites(state), self.lazy_load(state, tab)])
            }
            AppAction::SelectTab(tab) => {
                state.selected_tab = tab;
                self.lazy_load(state, tab)
            }
            AppAction::ToggleFavorite(id)
            | AppAction::Sports(SportsAction::ToggleFavorite(id))
            | AppAction::News(NewsAction::ToggleFavorite(id)) => self.toggle_favorite(state, id),
            AppAction::FavoritesLoaded(Ok(ids)) => self.favorites_loaded(state, ids),
            AppAction::FavoritesLoaded(Err(err)) => {
                tracing::warn!(error = %err, "Failed to load favorites");
                state.favorites_error = Some(err.to_string());
                state.favorites_requested = false;
                state.favorites_loaded = true;
                state.pending_toggles.clear();
                Effect::none()
            }
            AppAction::FavoritesSaved(Err(err)) => {
                tracing::warn!(error = %err, "Failed to save favorites");
                state.favorites_error = Some(err.to_string());
                Effect::none()
            }
            AppAction::FavoritesSaved(Ok(())) => {
                state.favorites_error = None;
                Effect::none()
            }
            action @ AppAction::Sports(_) => self.sports.reduce(state, action),
            action @ AppAction::News(_) => self.news.reduce(state, action),
            action @ AppAction::Flights(_) => self.flights.reduce(state, action),
            action @ AppAction::Weather(_) => self.weather.reduce(state, action),
            action @ AppAction::Rentals(_) => self.rentals.reduce(state, action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SportEvent;
    use crate::persistence::MemoryRepository;

    fn reducer_with(settings: FeatureSettings) -> AppReducer {
        AppReducer::new(AppEnvironment {
            clients: Clients::fixtures(),
            favorites: Arc::new(MemoryRepository::new()),
            settings,
        })
    }

    fn reducer() -> AppReducer {
        reducer_with(FeatureSettings::default())
    }

    fn ids(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn loaded_state() -> AppState {
        AppState {
            favorites_loaded: true,
            ..AppState::default()
        }
    }

    #[test]
    fn toggle_updates_root_and_mirrors() {
        let reducer = reducer();
        let mut state = loaded_state();

        let effect = reducer.reduce(&mut state, AppAction::ToggleFavorite("sport-42".into()));

        assert_eq!(state.favorite_ids, ids(&["sport-42"]));
        assert_eq!(state.sports.favorites, ids(&["sport-42"]));
        assert_eq!(state.news.favorites, ids(&["sport-42"]));
        assert_eq!(
            format!("{:?}", effect),
            r#"Run { id: Some(EffectId("favorites.save")), .. }"#
        );

        reducer.reduce(&mut state, AppAction::ToggleFavorite("sport-42".into()));
        assert!(state.favorite_ids.is_empty());
        assert!(state.sports.favorites.is_empty());
    }

    #[test]
    fn feature_toggles_are_routed_to_root() {
        let reducer = reducer();
        let mut state = AppState::default();

        reducer.reduce(
            &mut state,
            AppAction::Sports(SportsAction::ToggleFavorite("sport-7".into())),
        );
        reducer.reduce(
            &mut state,
            AppAction::News(NewsAction::ToggleFavorite("news-1".into())),
        );

        assert_eq!(state.favorite_ids, ids(&["news-1", "sport-7"]));
        assert_eq!(state.news.favorites, state.favorite_ids);
    }

    #[test]
    fn feature_actions_touch_only_their_slice() {
        let reducer = reducer();
        let mut state = AppState::default();
        let before = state.clone();

        reducer.reduce(
            &mut state,
            AppAction::Sports(SportsAction::EventsLoaded(Ok(vec![SportEvent {
                id: "sport-1".into(),
                title: "Final".into(),
                league: "Cup".into(),
                starts_at: "today".into(),
            }]))),
        );

        assert_ne!(state.sports, before.sports);
        assert_eq!(
            AppState {
                sports: before.sports.clone(),
                ..state.clone()
            },
            before
        );
    }

    #[test]
    fn on_appear_runs_once() {
        let reducer = reducer();
        let mut state = AppState::default();

        let first = reducer.reduce(&mut state, AppAction::OnAppear);
        assert!(state.appeared);
        assert!(state.sports.events.is_loading());
        assert!(!first.is_none());

        let second = reducer.reduce(&mut state, AppAction::OnAppear);
        assert!(second.is_none());
    }

    #[test]
    fn selecting_weather_loads_default_city_once() {
        let reducer = reducer_with(FeatureSettings {
            default_city: Some("Lisbon".into()),
            ..FeatureSettings::default()
        });
        let mut state = AppState::default();

        let effect = reducer.reduce(&mut state, AppAction::SelectTab(Tab::Weather));
        assert_eq!(state.selected_tab, Tab::Weather);
        assert_eq!(state.weather.city.as_deref(), Some("Lisbon"));
        assert!(!effect.is_none());

        let again = reducer.reduce(&mut state, AppAction::SelectTab(Tab::Weather));
        assert!(again.is_none());
    }

    #[test]
    fn loaded_favorites_reach_mirrors() {
        let reducer = reducer();
        let mut state = AppState::default();

        reducer.reduce(
            &mut state,
            AppAction::FavoritesLoaded(Ok(vec!["sport-42".into(), "news-3".into()])),
        );

        assert_eq!(state.favorite_ids, ids(&["news-3", "sport-42"]));
        assert_eq!(state.sports.favorites, state.favorite_ids);
    }

    #[test]
    fn toggles_before_initial_load_are_replayed() {
        let reducer = reducer();
        let mut state = AppState::default();
        reducer.reduce(&mut state, AppAction::OnAppear);

        let effect = reducer.reduce(&mut state, AppAction::ToggleFavorite("sport-42".into()));
        assert!(effect.is_none());
        reducer.reduce(&mut state, AppAction::ToggleFavorite("news-1".into()));

        let effect = reducer.reduce(
            &mut state,
            AppAction::FavoritesLoaded(Ok(vec!["news-1".into(), "sport-7".into()])),
        );

        assert_eq!(state.favorite_ids, ids(&["sport-42", "sport-7"]));
        assert_eq!(state.sports.favorites, state.favorite_ids);
        assert!(state.pending_toggles.is_empty());
        assert_eq!(
            format!("{:?}", effect),
            r#"Run { id: Some(EffectId("favorites.save")), .. }"#
        );
    }

    #[test]
    fn toggle_before_any_load_reads_favorites_first() {
        let reducer = reducer();
        let mut state = AppState::default();

        let effect = reducer.reduce(&mut state, AppAction::ToggleFavorite("c".into()));
        assert_eq!(
            format!("{:?}", effect),
            r#"Run { id: Some(EffectId("favorites.load")), .. }"#
        );
        assert!(state.favorites_requested);
        assert_eq!(state.pending_toggles, ids(&["c"]));

        let effect = reducer.reduce(&mut state, AppAction::ToggleFavorite("d".into()));
        assert!(effect.is_none());

        reducer.reduce(
            &mut state,
            AppAction::FavoritesLoaded(Ok(vec!["a".into(), "b".into()])),
        );
        assert_eq!(state.favorite_ids, ids(&["a", "b", "c", "d"]));
        assert!(!state.favorites_requested);
    }

    #[test]
    fn on_appear_skips_load_when_already_read() {
        let reducer = reducer();
        let mut state = loaded_state();

        reducer.reduce(&mut state, AppAction::OnAppear);
        assert!(!state.favorites_requested);
    }

    #[test]
    fn storage_failure_is_recorded() {
        let reducer = reducer();
        let mut state = AppState::default();

        reducer.reduce(
            &mut state,
            AppAction::FavoritesSaved(Err(PersistenceError::Serialize("bad".into()))),
        );
        assert_eq!(
            state.favorites_error.as_deref(),
            Some("Failed to encode favorites: bad")
        );

        reducer.reduce(&mut state, AppAction::FavoritesSaved(Ok(())));
        assert_eq!(state.favorites_error, None);
    }
}
