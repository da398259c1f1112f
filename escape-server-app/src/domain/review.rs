use chrono::NaiveDate;
use validator::Validate;

use crate::domain::{GameId, ReviewId, RoomId, UserId, rating::ReviewRatings};

/// A user's review of a game. `room_id` and `user_id` mirror the owning
/// game, which never changes room or user.
#[derive(Clone, Debug, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub game_id: GameId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub ratings: ReviewRatings,
    pub scenery: u8,
    pub title: String,
    pub text: String,
    pub comment_date: NaiveDate,
}

#[derive(Clone, Debug)]
pub struct NewReview {
    pub game_id: GameId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub ratings: ReviewRatings,
    pub scenery: u8,
    pub title: String,
    pub text: String,
    pub comment_date: NaiveDate,
}

#[derive(Clone, Debug, Validate)]
pub struct ReviewPayload {
    #[validate(range(min = 1, max = 10))]
    pub overall_rating: u8,
    #[validate(range(max = 10))]
    pub scary_rating: u8,
    #[validate(range(max = 3))]
    pub difficulty_rating: u8,
    #[validate(range(max = 10))]
    pub scenery: u8,
    #[validate(length(max = 550))]
    pub title: String,
    pub text: String,
}

impl ReviewPayload {
    pub fn ratings(&self) -> ReviewRatings {
        ReviewRatings {
            overall: self.overall_rating,
            scary: self.scary_rating,
            difficulty: self.difficulty_rating,
        }
    }
}
