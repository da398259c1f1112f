use std::sync::Arc;

use crate::{
    domain::{GameId, UserId, room::Room},
    ports::store::{Store, StoreTransaction},
    workflow::{
        Resource, WorkflowError, ensure_owner, notify::NotifyRecommendationWorkflow,
        require_actor,
    },
};

#[async_trait::async_trait]
pub trait DeleteGameUseCase {
    async fn delete_game(&self, actor: Option<UserId>, game_id: GameId)
    -> Result<(), WorkflowError>;
}

pub struct DeleteGameUseCaseImpl<S: Store, N: NotifyRecommendationWorkflow> {
    store: Arc<S>,
    notify_workflow: Arc<N>,
}

impl<S: Store, N: NotifyRecommendationWorkflow> DeleteGameUseCaseImpl<S, N> {
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
> DeleteGameUseCase for DeleteGameUseCaseImpl<S, N>
{
    /// Deleting a game also deletes its review, so the room aggregates and
    /// the user's review count are retracted in the same transaction.
    async fn delete_game(
        &self,
        actor: Option<UserId>,
        game_id: GameId,
    ) -> Result<(), WorkflowError> {
        let user_id = require_actor(actor)?;

        let mut tx = self.store.begin().await?;
        let user = tx
            .lock_user(user_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::User))?;
        let game = tx
            .get_game(game_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Game))?;
        ensure_owner(&game, user_id, Resource::Game)?;

        let mut usage = user.usage;
        let mut changed_room: Option<Room> = None;
        if let Some(review) = tx.find_review_by_game(game.id).await? {
            let room = tx
                .lock_room(game.room_id)
                .await
                .map_err(WorkflowError::retrieve(Resource::Room))?;
            tx.delete_review(review.id).await?;
            let ratings = room.ratings.retract_review(&review.ratings);
            tx.update_room_ratings(room.id, &ratings)
                .await
                .map_err(WorkflowError::update(Resource::Room))?;
            usage = usage.review_deleted();
            changed_room = Some(Room { ratings, ..room });
        }

        tx.delete_game(game.id).await?;
        usage = usage.game_deleted(game.time);
        tx.update_user_usage(user_id, &usage)
            .await
            .map_err(WorkflowError::update(Resource::User))?;
        tx.commit().await?;

        self.notify_workflow
            .room_completion_cancelled(game.room_id, user_id)
            .await;
        if let Some(room) = changed_room {
            self.notify_workflow
                .room_rating_cancelled(game.room_id, user_id)
                .await;
            self.notify_workflow.room_changed(&room.snapshot()).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::rating::RoomRatings,
        ports::recommendation::SinkCall,
        workflow::{
            game::create::{CreateGameUseCase, CreateGameUseCaseImpl},
            review::submit::{SubmitReviewUseCase, SubmitReviewUseCaseImpl},
            testing::{Fixture, game_payload, review_payload},
        },
    };

    use super::*;

    #[tokio::test]
    async fn test_delete_game_without_review() {
        let f = Fixture::new();
        let room = f.room("Vault").await;
        let user = f.user("a@b.co").await;
        let game = CreateGameUseCaseImpl::new(f.store.clone(), f.notify.clone())
            .create_game(Some(user.id), room.id, game_payload(40))
            .await
            .expect("Failed to create game");
        f.port.clear();

        DeleteGameUseCaseImpl::new(f.store.clone(), f.notify.clone())
            .delete_game(Some(user.id), game.id)
            .await
            .expect("Failed to delete game");

        let usage = f.user_state(&user).await.usage;
        assert_eq!(usage.rooms_count, 0);
        assert_eq!((usage.time_sum, usage.timed_count), (0, 0));
        assert_eq!(
            f.port.calls(),
            vec![SinkCall::CancelCompletion(room.id, user.id)]
        );
    }

    #[tokio::test]
    async fn test_delete_game_retracts_its_review() {
        let f = Fixture::new();
        let room = f.room("Vault").await;
        let user = f.user("a@b.co").await;
        SubmitReviewUseCaseImpl::new(f.store.clone(), f.notify.clone())
            .submit_review(Some(user.id), room.id, review_payload(8, 6, 2))
            .await
            .expect("Failed to submit review");
        let game = f
            .store
            .query_games_by_user(user.id)
            .await
            .expect("Failed to list games")
            .remove(0);
        f.port.clear();

        DeleteGameUseCaseImpl::new(f.store.clone(), f.notify.clone())
            .delete_game(Some(user.id), game.id)
            .await
            .expect("Failed to delete game");

        assert_eq!(f.room_state(&room).await.ratings, RoomRatings::default());
        let usage = f.user_state(&user).await.usage;
        assert_eq!((usage.rooms_count, usage.reviews_count), (0, 0));
        assert!(
            f.store
                .query_reviews_by_room(room.id)
                .await
                .expect("Failed to list reviews")
                .is_empty()
        );

        let calls = f.port.calls();
        assert_eq!(calls[0], SinkCall::CancelCompletion(room.id, user.id));
        assert_eq!(calls[1], SinkCall::CancelRating(room.id, user.id));
        assert!(matches!(&calls[2], SinkCall::RoomSnapshot(s) if s.overall_rating == 0.0));
    }

    #[tokio::test]
    async fn test_delete_foreign_game_is_forbidden() {
        let f = Fixture::new();
        let room = f.room("Vault").await;
        let owner = f.user("a@b.co").await;
        let other = f.user("c@d.co").await;
        let game = CreateGameUseCaseImpl::new(f.store.clone(), f.notify.clone())
            .create_game(Some(owner.id), room.id, game_payload(0))
            .await
            .expect("Failed to create game");
        let use_case = DeleteGameUseCaseImpl::new(f.store.clone(), f.notify.clone());

        assert!(matches!(
            use_case.delete_game(Some(other.id), game.id).await,
            Err(WorkflowError::Forbidden(Resource::Game))
        ));
        assert!(matches!(
            use_case.delete_game(None, game.id).await,
            Err(WorkflowError::Unauthenticated)
        ));
        assert_eq!(f.user_state(&owner).await.usage.rooms_count, 1);
    }
}
