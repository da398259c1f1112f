use std::sync::Arc;

use crate::{
    domain::{RoomId, UserId, room::RoomSnapshot},
    ports::recommendation::{RecommendationPort, SinkError},
};

/// Best-effort delivery of usage events to the recommendation service.
/// Failures are logged and never reach the caller.
#[async_trait::async_trait]
pub trait NotifyRecommendationWorkflow {
    async fn user_created(&self, user_id: UserId);
    async fn room_viewed(&self, room_id: RoomId, user_id: UserId);
    /// A rated completion also records the rating.
    async fn room_completed(&self, room_id: RoomId, user_id: UserId, rating: Option<u8>);
    async fn room_rated(&self, room_id: RoomId, user_id: UserId, rating: u8);
    async fn room_rating_updated(&self, room_id: RoomId, user_id: UserId, rating: u8);
    async fn room_completion_cancelled(&self, room_id: RoomId, user_id: UserId);
    async fn room_rating_cancelled(&self, room_id: RoomId, user_id: UserId);
    async fn room_changed(&self, snapshot: &RoomSnapshot);
}

pub struct NotifyRecommendationWorkflowImpl<R: RecommendationPort> {
    recommendation_port: Arc<R>,
}

impl<R: RecommendationPort> NotifyRecommendationWorkflowImpl<R> {
    pub fn new(recommendation_port: Arc<R>) -> Self {
        Self {
            recommendation_port,
        }
    }
}

fn report(event: std::fmt::Arguments<'_>, result: Result<(), SinkError>) {
    if let Err(e) = result {
        log::warn!("Failed to notify recommendation service of {}: {}", event, e);
    }
}

#[async_trait::async_trait]
impl<R: RecommendationPort + Send + Sync + 'static> NotifyRecommendationWorkflow
    for NotifyRecommendationWorkflowImpl<R>
{
    async fn user_created(&self, user_id: UserId) {
        let result = self.recommendation_port.notify_user_created(user_id).await;
        report(format_args!("new user {}", user_id), result);
    }

    async fn room_viewed(&self, room_id: RoomId, user_id: UserId) {
        let result = self.recommendation_port.notify_view(room_id, user_id).await;
        report(
            format_args!("view of room {} by user {}", room_id, user_id),
            result,
        );
    }

    async fn room_completed(&self, room_id: RoomId, user_id: UserId, rating: Option<u8>) {
        let result = self
            .recommendation_port
            .notify_completion(room_id, user_id, rating)
            .await;
        report(
            format_args!("completion of room {} by user {}", room_id, user_id),
            result,
        );
    }

    async fn room_rated(&self, room_id: RoomId, user_id: UserId, rating: u8) {
        let result = self
            .recommendation_port
            .notify_rating(room_id, user_id, rating)
            .await;
        report(
            format_args!("rating of room {} by user {}", room_id, user_id),
            result,
        );
    }

    async fn room_rating_updated(&self, room_id: RoomId, user_id: UserId, rating: u8) {
        let result = self
            .recommendation_port
            .notify_rating_update(room_id, user_id, rating)
            .await;
        report(
            format_args!("rating update of room {} by user {}", room_id, user_id),
            result,
        );
    }

    async fn room_completion_cancelled(&self, room_id: RoomId, user_id: UserId) {
        let result = self
            .recommendation_port
            .cancel_completion(room_id, user_id)
            .await;
        report(
            format_args!("cancelled completion of room {} by user {}", room_id, user_id),
            result,
        );
    }

    async fn room_rating_cancelled(&self, room_id: RoomId, user_id: UserId) {
        let result = self.recommendation_port.cancel_rating(room_id, user_id).await;
        report(
            format_args!("cancelled rating of room {} by user {}", room_id, user_id),
            result,
        );
    }

    async fn room_changed(&self, snapshot: &RoomSnapshot) {
        let result = self.recommendation_port.sync_room_snapshot(snapshot).await;
        report(format_args!("room {} snapshot", snapshot.room_id), result);
    }
}
