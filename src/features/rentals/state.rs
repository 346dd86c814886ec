use crate::client::CarOffer;
use crate::features::Loadable;
use crate::runtime::FeatureState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RentalsState {
    pub location: Option<String>,
    pub offers: Loadable<Vec<CarOffer>>,
    pub selected_offer: Option<String>,
}

impl FeatureState for RentalsState {}

impl RentalsState {
    pub fn selected(&self) -> Option<&CarOffer> {
        let id = self.selected_offer.as_deref()?;
        self.offers.value()?.iter().find(|o| o.id == id)
    }
}
