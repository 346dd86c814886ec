use crate::client::{CarOffer, ClientError};
use crate::runtime::Action;

#[derive(Debug, Clone, PartialEq)]
pub enum RentalsAction {
    /// Look up offers at a pickup location.
    Search(String),
    OffersResponse(Result<Vec<CarOffer>, ClientError>),
    /// Pick one of the loaded offers.
    SelectOffer(String),
}

impl Action for RentalsAction {}
