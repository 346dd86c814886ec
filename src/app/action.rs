use crate::features::flights::FlightsAction;
use crate::features::news::NewsAction;
use crate::features::rentals::RentalsAction;
use crate::features::sports::SportsAction;
use crate::features::weather::WeatherAction;
use crate::persistence::PersistenceError;
use crate::runtime::Action;

use super::state::Tab;

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// The shell came up; loads the first tab, and persisted favorites if
    /// they were not read yet.
    OnAppear,
    SelectTab(Tab),
    ToggleFavorite(String),
    FavoritesLoaded(Result<Vec<String>, PersistenceError>),
    FavoritesSaved(Result<(), PersistenceError>),
    Sports(SportsAction),
    News(NewsAction),
    Flights(FlightsAction),
    Weather(WeatherAction),
    Rentals(RentalsAction),
}

impl Action for AppAction {}
