use std::sync::Arc;

use crate::{
    domain::{RoomId, UserId},
    ports::store::Store,
    workflow::{
        Resource, WorkflowError, notify::NotifyRecommendationWorkflow, room::RoomView,
    },
};

#[async_trait::async_trait]
pub trait GetRoomUseCase {
    async fn get_room(
        &self,
        actor: Option<UserId>,
        room_id: RoomId,
    ) -> Result<RoomView, WorkflowError>;
}

pub struct GetRoomUseCaseImpl<S: Store, N: NotifyRecommendationWorkflow> {
    store: Arc<S>,
    notify_workflow: Arc<N>,
}

impl<S: Store, N: NotifyRecommendationWorkflow> GetRoomUseCaseImpl<S, N> {
    pub fn new(store: Arc<S>, notify_workflow: Arc<N>) -> Self {
        Self {
            store,
            notify_workflow,
        }
    }
}

#[async_trait::async_trait]
impl<
    S: Store + Send + Sync + 'static,
    N: NotifyRecommendationWorkflow + Send + Sync + 'static,
> GetRoomUseCase for GetRoomUseCaseImpl<S, N>
{
    async fn get_room(
        &self,
        actor: Option<UserId>,
        room_id: RoomId,
    ) -> Result<RoomView, WorkflowError> {
        let room = self
            .store
            .get_room(room_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Room))?;

        let Some(user_id) = actor else {
            return Ok(RoomView::new(room, false));
        };
        let already_rated = self
            .store
            .query_reviews_by_room(room_id)
            .await?
            .iter()
            .any(|review| review.user_id == user_id);

        self.notify_workflow.room_viewed(room_id, user_id).await;
        Ok(RoomView::new(room, already_rated))
    }
}
