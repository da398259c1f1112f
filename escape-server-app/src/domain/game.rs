use chrono::{DateTime, Utc};
use validator::Validate;

use crate::domain::{GameId, RoomId, UserId};

/// A record that a user played a room. A user has at most one game per room.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub user_id: UserId,
    pub room_id: RoomId,
    /// Minutes spent in the room, 0 if unknown.
    pub time: u32,
    pub other_players: String,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewGame {
    pub user_id: UserId,
    pub room_id: RoomId,
    pub time: u32,
    pub other_players: String,
    pub date: DateTime<Utc>,
}

impl NewGame {
    pub fn untimed(user_id: UserId, room_id: RoomId, date: DateTime<Utc>) -> Self {
        Self {
            user_id,
            room_id,
            time: 0,
            other_players: String::new(),
            date,
        }
    }
}

#[derive(Clone, Debug, Default, Validate)]
pub struct GamePayload {
    #[validate(range(max = 240))]
    pub time: u32,
    #[validate(length(max = 2550))]
    pub other_players: String,
    pub date: Option<DateTime<Utc>>,
}

/// Fields left as `None` keep their stored value.
#[derive(Clone, Debug, Default, Validate)]
pub struct GameUpdate {
    pub room_id: Option<RoomId>,
    #[validate(range(max = 240))]
    pub time: Option<u32>,
    #[validate(length(max = 2550))]
    pub other_players: Option<String>,
    pub date: Option<DateTime<Utc>>,
}
