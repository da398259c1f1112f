use escape_server_app::{
    domain::{RoomId, UserId, room::RoomSnapshot},
    ports::recommendation::{RecommendationPort, SinkError},
};
use serde::Serialize;
use thiserror::Error;

use crate::request::{Batch, Interaction, RATING_BOOSTER, RecommendationResponse, room_values};

pub mod config;
pub mod request;

pub use config::RecommendationConfig;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to serialize/deserialize message: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Service responded with status {0}")]
    NotOkResponse(u16),
}

impl From<HttpError> for SinkError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Request(e) => SinkError::Request(e.to_string()),
            HttpError::Serde(e) => SinkError::Decode(e.to_string()),
            HttpError::NotOkResponse(status) => SinkError::Status(status),
        }
    }
}

/// Client of the external recommendation service's JSON API, scoped to one
/// database.
#[derive(Clone)]
pub struct HttpRecommendationClient {
    http_client: reqwest::Client,
    database_url: String,
    token: String,
}

impl HttpRecommendationClient {
    pub fn new(config: RecommendationConfig) -> Result<Self, HttpError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http_client,
            database_url: format!("{}/{}", config.base_url, config.database),
            token: config.token,
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, HttpError> {
        let resp = request.bearer_auth(&self.token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            log::debug!("Recommendation service rejected request with {}", status);
            return Err(HttpError::NotOkResponse(status.as_u16()));
        }
        Ok(resp.text().await?)
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), HttpError> {
        let request = self
            .http_client
            .post(format!("{}{}", self.database_url, path))
            .json(body);
        self.send(request).await?;
        Ok(())
    }

    async fn put(&self, path: &str) -> Result<(), HttpError> {
        let request = self.http_client.put(format!("{}{}", self.database_url, path));
        self.send(request).await?;
        Ok(())
    }

    async fn delete_interaction(
        &self,
        path: &str,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<(), HttpError> {
        let request = self
            .http_client
            .delete(format!("{}{}", self.database_url, path))
            .query(&[
                ("userId", user_id.to_string()),
                ("itemId", room_id.to_string()),
            ]);
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecommendationPort for HttpRecommendationClient {
    async fn notify_user_created(&self, user_id: UserId) -> Result<(), SinkError> {
        Ok(self.put(&format!("/users/{}", user_id)).await?)
    }

    async fn notify_view(&self, room_id: RoomId, user_id: UserId) -> Result<(), SinkError> {
        Ok(self
            .post("/detailviews/", &Interaction::new(room_id, user_id))
            .await?)
    }

    async fn notify_completion(
        &self,
        room_id: RoomId,
        user_id: UserId,
        rating: Option<u8>,
    ) -> Result<(), SinkError> {
        self.post("/purchases/", &Interaction::new(room_id, user_id))
            .await?;
        if let Some(rating) = rating {
            self.notify_rating(room_id, user_id, rating).await?;
        }
        Ok(())
    }

    async fn notify_rating(
        &self,
        room_id: RoomId,
        user_id: UserId,
        rating: u8,
    ) -> Result<(), SinkError> {
        Ok(self
            .post("/ratings/", &Interaction::rated(room_id, user_id, rating))
            .await?)
    }

    async fn notify_rating_update(
        &self,
        room_id: RoomId,
        user_id: UserId,
        new_rating: u8,
    ) -> Result<(), SinkError> {
        Ok(self
            .post(
                "/batch/",
                &Batch::replace_rating(room_id, user_id, new_rating),
            )
            .await?)
    }

    async fn cancel_completion(&self, room_id: RoomId, user_id: UserId) -> Result<(), SinkError> {
        Ok(self
            .delete_interaction("/purchases/", room_id, user_id)
            .await?)
    }

    async fn cancel_rating(&self, room_id: RoomId, user_id: UserId) -> Result<(), SinkError> {
        Ok(self
            .delete_interaction("/ratings/", room_id, user_id)
            .await?)
    }

    async fn sync_room_snapshot(&self, room: &RoomSnapshot) -> Result<(), SinkError> {
        Ok(self
            .post(&format!("/items/{}", room.room_id), &room_values(room))
            .await?)
    }

    async fn sync_room_snapshots(&self, rooms: &[RoomSnapshot]) -> Result<(), SinkError> {
        Ok(self
            .post("/batch/", &Batch::set_room_values(rooms))
            .await?)
    }

    async fn sync_users(&self, user_ids: &[UserId]) -> Result<(), SinkError> {
        Ok(self.post("/batch/", &Batch::add_users(user_ids)).await?)
    }

    async fn recommend_rooms(
        &self,
        user_id: UserId,
        count: usize,
    ) -> Result<Vec<RoomId>, SinkError> {
        let request = self
            .http_client
            .get(format!(
                "{}/recomms/users/{}/items/",
                self.database_url, user_id
            ))
            .query(&[
                ("count", count.to_string()),
                ("booster", RATING_BOOSTER.to_string()),
            ]);
        let body = self.send(request).await?;
        let response: RecommendationResponse =
            serde_json::from_str(&body).map_err(HttpError::from)?;

        let mut room_ids = Vec::with_capacity(response.recomms.len());
        for recommendation in response.recomms {
            match recommendation.id.parse() {
                Ok(id) => room_ids.push(RoomId(id)),
                Err(_) => log::warn!("Ignoring unknown recommended item {}", recommendation.id),
            }
        }
        Ok(room_ids)
    }
}
