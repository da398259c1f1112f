use escape_server_app::domain::{RoomId, UserId, room::RoomSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Booster favouring well rated rooms in personal recommendations.
pub const RATING_BOOSTER: &str = "if 'totalRating' <= 2 then 0.2 else \
    (if 'totalRating' <= 5 then 0.5 else \
    (if 'totalRating' <= 8 then 0.8 else 1.1))";

/// Maps a 1..=10 rating onto the service's [-1, 1] scale, 5 being neutral.
pub fn normalize_rating(rating: u8) -> f64 {
    (f64::from(rating) - 5.0) / 5.0
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub user_id: String,
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub cascade_create: bool,
}

impl Interaction {
    pub fn new(room_id: RoomId, user_id: UserId) -> Self {
        Self {
            user_id: user_id.to_string(),
            item_id: room_id.to_string(),
            rating: None,
            cascade_create: true,
        }
    }

    pub fn rated(room_id: RoomId, user_id: UserId, rating: u8) -> Self {
        Self {
            rating: Some(normalize_rating(rating)),
            ..Self::new(room_id, user_id)
        }
    }
}

/// The item properties the service indexes for a room.
pub fn room_values(room: &RoomSnapshot) -> Value {
    json!({
        "name": room.name,
        "totalRating": room.overall_rating,
        "scary_rank": room.scary_rating,
        "difficulty_rank": room.difficulty_rating,
        "is_culinary": room.is_culinary,
        "minimal_people_amount": room.minimal_people_amount,
        "maximal_people_amount": room.maximal_people_amount,
        "!cascadeCreate": true,
    })
}

#[derive(Serialize, Debug, PartialEq)]
pub struct BatchRequest {
    pub method: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Serialize, Debug)]
pub struct Batch {
    pub requests: Vec<BatchRequest>,
}

impl Batch {
    pub fn set_room_values(rooms: &[RoomSnapshot]) -> Self {
        Self {
            requests: rooms
                .iter()
                .map(|room| BatchRequest {
                    method: "POST",
                    path: format!("/items/{}", room.room_id),
                    params: Some(room_values(room)),
                })
                .collect(),
        }
    }

    pub fn add_users(user_ids: &[UserId]) -> Self {
        Self {
            requests: user_ids
                .iter()
                .map(|user_id| BatchRequest {
                    method: "PUT",
                    path: format!("/users/{}", user_id),
                    params: None,
                })
                .collect(),
        }
    }

    /// Replaces a user's rating of a room: the old one is removed first.
    pub fn replace_rating(room_id: RoomId, user_id: UserId, rating: u8) -> Self {
        Self {
            requests: vec![
                BatchRequest {
                    method: "DELETE",
                    path: format!("/ratings/?userId={}&itemId={}", user_id, room_id),
                    params: None,
                },
                BatchRequest {
                    method: "POST",
                    path: "/ratings/".to_string(),
                    params: serde_json::to_value(Interaction::rated(room_id, user_id, rating)).ok(),
                },
            ],
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Recommendation {
    pub id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recomm_id: Option<String>,
    pub recomms: Vec<Recommendation>,
}
