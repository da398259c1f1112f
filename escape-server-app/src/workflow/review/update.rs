use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::{
        ReviewId, UserId,
        reconcile::reconcile_room_ratings,
        review::{Review, ReviewPayload},
        room::Room,
    },
    ports::store::{Store, StoreTransaction},
    workflow::{
        Resource, WorkflowError, ensure_owner, notify::NotifyRecommendationWorkflow,
        require_actor,
    },
};

#[async_trait::async_trait]
pub trait UpdateReviewUseCase {
    async fn update_review(
        &self,
        actor: Option<UserId>,
        review_id: ReviewId,
        payload: ReviewPayload,
    ) -> Result<Review, WorkflowError>;
}

pub struct UpdateReviewUseCaseImpl<S: Store, N: NotifyRecommendationWorkflow> {
    store: Arc<S>,
    notify_workflow: Arc<N>,
}

impl<S: Store, N: NotifyRecommendationWorkflow> UpdateReviewUseCaseImpl<S, N> {
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
> UpdateReviewUseCase for UpdateReviewUseCaseImpl<S, N>
{
    async fn update_review(
        &self,
        actor: Option<UserId>,
        review_id: ReviewId,
        payload: ReviewPayload,
    ) -> Result<Review, WorkflowError> {
        let user_id = require_actor(actor)?;
        payload.validate()?;

        let mut tx = self.store.begin().await?;
        tx.lock_user(user_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::User))?;
        let stored = tx
            .get_review(review_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Review))?;
        let game = tx
            .get_game(stored.game_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Game))?;
        ensure_owner(&game, user_id, Resource::Review)?;

        let room = tx
            .lock_room(game.room_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Room))?;
        let review = Review {
            ratings: payload.ratings(),
            scenery: payload.scenery,
            title: payload.title,
            text: payload.text,
            ..stored
        };
        tx.update_review(&review)
            .await
            .map_err(WorkflowError::update(Resource::Review))?;

        // Several dimensions may change at once, so recount from the stored reviews.
        let reviews = tx.query_reviews_by_room(room.id).await?;
        let room = Room {
            ratings: reconcile_room_ratings(reviews.iter().map(|r| &r.ratings)),
            ..room
        };
        tx.update_room_ratings(room.id, &room.ratings)
            .await
            .map_err(WorkflowError::update(Resource::Room))?;
        tx.commit().await?;

        self.notify_workflow
            .room_rating_updated(room.id, user_id, review.ratings.overall)
            .await;
        self.notify_workflow.room_changed(&room.snapshot()).await;
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ports::recommendation::SinkCall,
        workflow::{
            review::submit::{SubmitReviewUseCase, SubmitReviewUseCaseImpl},
            testing::{Fixture, review_payload},
        },
    };

    use super::*;

    #[tokio::test]
    async fn test_update_review_recounts_every_dimension() {
        let f = Fixture::new();
        let room = f.room("Vault").await;
        let alice = f.user("a@b.co").await;
        let bob = f.user("c@d.co").await;
        let submit = SubmitReviewUseCaseImpl::new(f.store.clone(), f.notify.clone());
        let review = submit
            .submit_review(Some(alice.id), room.id, review_payload(9, 8, 3))
            .await
            .expect("Failed to submit review");
        submit
            .submit_review(Some(bob.id), room.id, review_payload(5, 0, 1))
            .await
            .expect("Failed to submit review");
        f.port.clear();

        let updated = UpdateReviewUseCaseImpl::new(f.store.clone(), f.notify.clone())
            .update_review(Some(alice.id), review.id, review_payload(7, 0, 2))
            .await
            .expect("Failed to update review");
        assert_eq!(updated.id, review.id);
        assert_eq!(updated.comment_date, review.comment_date);

        let ratings = f.room_state(&room).await.ratings;
        assert_eq!((ratings.overall.sum, ratings.overall.count), (12, 2));
        assert_eq!(ratings.overall.average, 6.0);
        assert_eq!((ratings.scary.sum, ratings.scary.count), (0, 0));
        assert_eq!((ratings.difficulty.sum, ratings.difficulty.count), (3, 2));
        assert_eq!(f.user_state(&alice).await.usage.reviews_count, 1);

        let calls = f.port.calls();
        assert_eq!(calls[0], SinkCall::RatingUpdate(room.id, alice.id, 7));
        assert!(matches!(&calls[1], SinkCall::RoomSnapshot(s) if s.overall_rating == 6.0));
    }

    #[tokio::test]
    async fn test_update_foreign_review_is_forbidden() {
        let f = Fixture::new();
        let room = f.room("Vault").await;
        let alice = f.user("a@b.co").await;
        let bob = f.user("c@d.co").await;
        let review = SubmitReviewUseCaseImpl::new(f.store.clone(), f.notify.clone())
            .submit_review(Some(alice.id), room.id, review_payload(9, 8, 3))
            .await
            .expect("Failed to submit review");
        let use_case = UpdateReviewUseCaseImpl::new(f.store.clone(), f.notify.clone());

        assert!(matches!(
            use_case
                .update_review(Some(bob.id), review.id, review_payload(1, 0, 0))
                .await,
            Err(WorkflowError::Forbidden(Resource::Review))
        ));
        assert!(matches!(
            use_case
                .update_review(Some(alice.id), ReviewId(999), review_payload(1, 0, 0))
                .await,
            Err(WorkflowError::NotFound(Resource::Review))
        ));
        assert_eq!(f.room_state(&room).await.ratings.overall.sum, 9);
    }
}
