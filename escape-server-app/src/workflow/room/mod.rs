use std::collections::HashSet;

use crate::{
    domain::{RoomId, UserId, room::Room},
    ports::store::Store,
    workflow::WorkflowError,
};

pub mod get;
pub mod list;
pub mod reconcile;
pub mod search_fields;

/// A room as presented to readers: averages rounded to one decimal.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomView {
    pub room: Room,
    pub overall_rating: f64,
    pub overall_count: u32,
    pub scary_rating: f64,
    pub scary_count: u32,
    pub difficulty_rating: f64,
    pub difficulty_count: u32,
    pub already_rated: bool,
}

impl RoomView {
    pub fn new(room: Room, already_rated: bool) -> Self {
        let ratings = room.ratings;
        Self {
            overall_rating: ratings.overall.rounded_average(),
            overall_count: ratings.overall.count,
            scary_rating: ratings.scary.rounded_average(),
            scary_count: ratings.scary.count,
            difficulty_rating: ratings.difficulty.rounded_average(),
            difficulty_count: ratings.difficulty.count,
            already_rated,
            room,
        }
    }
}

/// Rooms the user has reviewed, through their games.
pub(crate) async fn rated_rooms<S: Store>(
    store: &S,
    user_id: UserId,
) -> Result<HashSet<RoomId>, WorkflowError> {
    let mut rated = HashSet::new();
    for game in store.query_games_by_user(user_id).await? {
        if store.find_review_by_game(game.id).await?.is_some() {
            rated.insert(game.room_id);
        }
    }
    Ok(rated)
}
