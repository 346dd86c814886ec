use std::sync::Arc;

use crate::client::WeatherClient;
use crate::features::Loadable;
use crate::runtime::{Effect, Reducer};

use super::action::WeatherAction;
use super::state::WeatherState;

pub const WEATHER_ID: &str = "weather";

#[derive(Clone)]
pub struct WeatherEnvironment {
    pub client: Arc<dyn WeatherClient>,
}

pub struct WeatherReducer {
    env: WeatherEnvironment,
}

impl WeatherReducer {
    pub fn new(env: WeatherEnvironment) -> Self {
        Self { env }
    }
}

impl Reducer for WeatherReducer {
    type State = WeatherState;
    type Action = WeatherAction;

    fn reduce(&self, state: &mut WeatherState, action: WeatherAction) -> Effect<WeatherAction> {
        match action {
            WeatherAction::Refresh(city) => {
                let city = city.trim().to_string();
                if city.is_empty() {
                    return Effect::none();
                }
                state.city = Some(city.clone());
                state.report = Loadable::Loading;

                let client = Arc::clone(&self.env.client);
                Effect::task(async move {
                    WeatherAction::WeatherResponse(client.current(&city).await)
                })
                .cancellable(WEATHER_ID)
            }
            WeatherAction::WeatherResponse(result) => {
                if let Err(err) = &result {
                    tracing::warn!(city = ?state.city, error = %err, "Weather lookup failed");
                }
                state.report = Loadable::from_result(result);
                Effect::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, FixtureClients};

    fn reducer() -> WeatherReducer {
        WeatherReducer::new(WeatherEnvironment {
            client: Arc::new(FixtureClients::new()),
        })
    }

    #[test]
    fn refresh_records_city() {
        let mut state = WeatherState::default();
        let effect = reducer().reduce(&mut state, WeatherAction::Refresh(" Berlin".into()));

        assert_eq!(state.city.as_deref(), Some("Berlin"));
        assert!(state.report.is_loading());
        assert!(!effect.is_none());
    }

    #[test]
    fn failure_becomes_message() {
        let mut state = WeatherState::default();
        reducer().reduce(
            &mut state,
            WeatherAction::WeatherResponse(Err(ClientError::Status {
                status: 503,
                message: "down".into(),
            })),
        );
        assert_eq!(state.report.error(), Some("HTTP 503: down"));
    }
}
