use std::sync::Arc;

use crate::client::RentalClient;
use crate::features::Loadable;
use crate::runtime::{Effect, Reducer};

use super::action::RentalsAction;
use super::state::RentalsState;

pub const RENTALS_ID: &str = "rentals";

#[derive(Clone)]
pub struct RentalsEnvironment {
    pub client: Arc<dyn RentalClient>,
}

pub struct RentalsReducer {
    env: RentalsEnvironment,
}

impl RentalsReducer {
    pub fn new(env: RentalsEnvironment) -> Self {
        Self { env }
    }
}

impl Reducer for RentalsReducer {
    type State = RentalsState;
    type Action = RentalsAction;

    fn reduce(&self, state: &mut RentalsState, action: RentalsAction) -> Effect<RentalsAction> {
        match action {
            RentalsAction::Search(location) => {
                let location = location.trim().to_string();
                if location.is_empty() {
                    return Effect::none();
                }
                state.location = Some(location.clone());
                state.offers = Loadable::Loading;
                state.selected_offer = None;

                let client = Arc::clone(&self.env.client);
                Effect::task(async move {
                    RentalsAction::OffersResponse(client.offers(&location).await)
                })
                .cancellable(RENTALS_ID)
            }
            RentalsAction::OffersResponse(result) => {
                if let Err(err) = &result {
                    tracing::warn!(location = ?state.location, error = %err, "Rental search failed");
                }
                state.offers = Loadable::from_result(result);
                Effect::none()
            }
            RentalsAction::SelectOffer(id) => {
                let known = state
                    .offers
                    .value()
                    .is_some_and(|offers| offers.iter().any(|o| o.id == id));
                if known {
                    state.selected_offer = Some(id);
                } else {
                    tracing::debug!(offer = %id, "Ignoring selection of unknown offer");
                }
                Effect::none()
            }
        }
    }
}
