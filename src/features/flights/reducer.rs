use std::sync::Arc;
use std::time::Duration;

use crate::client::FlightClient;
use crate::runtime::{Effect, Reducer};

use super::action::FlightsAction;
use super::state::FlightsState;

/// Cancellation id of the tracking effect.
pub const TRACK_ID: &str = "trackFlight";

#[derive(Clone)]
pub struct FlightsEnvironment {
    pub client: Arc<dyn FlightClient>,
    /// Re-fetch interval while tracking; `None` fetches once.
    pub poll_interval: Option<Duration>,
}

pub struct FlightsReducer {
    env: FlightsEnvironment,
}

impl FlightsReducer {
    pub fn new(env: FlightsEnvironment) -> Self {
        Self { env }
    }
}

impl Reducer for FlightsReducer {
    type State = FlightsState;
    type Action = FlightsAction;

    fn reduce(&self, state: &mut FlightsState, action: FlightsAction) -> Effect<FlightsAction> {
        match action {
            FlightsAction::TrackFlight(code) => {
                let code = code.trim().to_uppercase();
                if code.is_empty() {
                    return Effect::none();
                }

                state.tracking = Some(code.clone());
                state.flight_status = None;
                state.error = None;
                state.is_loading = true;

                let client = Arc::clone(&self.env.client);
                let poll_interval = self.env.poll_interval;
                Effect::run(move |sender| async move {
                    loop {
                        let result = client.track(&code).await;
                        sender.send(FlightsAction::FlightResponse(result));
                        let Some(interval) = poll_interval else {
                            break;
                        };
                        tokio::select! {
                            _ = sender.cancelled() => break,
                            _ = tokio::time::sleep(interval) => {}
                        }
                    }
                })
                .cancellable(TRACK_ID)
            }
            FlightsAction::FlightResponse(Ok(status)) => {
                state.flight_status = Some(status);
                state.error = None;
                state.is_loading = false;
                Effect::none()
            }
            FlightsAction::FlightResponse(Err(err)) => {
                tracing::warn!(
                    flight = state.tracking.as_deref().unwrap_or("-"),
                    error = %err,
                    "Flight lookup failed"
                );
                state.error = Some(err.to_string());
                state.is_loading = false;
                Effect::none()
            }
            FlightsAction::StopTracking => {
                state.tracking = None;
                state.is_loading = false;
                Effect::cancel(TRACK_ID)
            }
        }
    }
}
