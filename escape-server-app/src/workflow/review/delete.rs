use std::sync::Arc;

use crate::{
    domain::{ReviewId, UserId, room::Room},
    ports::store::{Store, StoreTransaction},
    workflow::{
        Resource, WorkflowError, ensure_owner, notify::NotifyRecommendationWorkflow,
        require_actor,
    },
};

#[async_trait::async_trait]
pub trait DeleteReviewUseCase {
    async fn delete_review(
        &self,
        actor: Option<UserId>,
        review_id: ReviewId,
    ) -> Result<(), WorkflowError>;
}

pub struct DeleteReviewUseCaseImpl<S: Store, N: NotifyRecommendationWorkflow> {
    store: Arc<S>,
    notify_workflow: Arc<N>,
}

impl<S: Store, N: NotifyRecommendationWorkflow> DeleteReviewUseCaseImpl<S, N> {
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
> DeleteReviewUseCase for DeleteReviewUseCaseImpl<S, N>
{
    async fn delete_review(
        &self,
        actor: Option<UserId>,
        review_id: ReviewId,
    ) -> Result<(), WorkflowError> {
        let user_id = require_actor(actor)?;

        let mut tx = self.store.begin().await?;
        let user = tx
            .lock_user(user_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::User))?;
        let review = tx
            .get_review(review_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Review))?;
        let game = tx
            .get_game(review.game_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Game))?;
        ensure_owner(&game, user_id, Resource::Review)?;

        let room = tx
            .lock_room(game.room_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Room))?;
        tx.delete_review(review.id).await?;
        let room = Room {
            ratings: room.ratings.retract_review(&review.ratings),
            ..room
        };
        tx.update_room_ratings(room.id, &room.ratings)
            .await
            .map_err(WorkflowError::update(Resource::Room))?;
        tx.update_user_usage(user_id, &user.usage.review_deleted())
            .await
            .map_err(WorkflowError::update(Resource::User))?;
        tx.commit().await?;

        self.notify_workflow
            .room_rating_cancelled(room.id, user_id)
            .await;
        self.notify_workflow.room_changed(&room.snapshot()).await;
        Ok(())
    }
}
