use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    domain::{
        RoomId, UserId,
        game::NewGame,
        review::{NewReview, Review, ReviewPayload},
        room::Room,
    },
    ports::store::{Store, StoreTransaction},
    workflow::{
        ConflictKind, Resource, WorkflowError, notify::NotifyRecommendationWorkflow,
        require_actor,
    },
};

#[async_trait::async_trait]
pub trait SubmitReviewUseCase {
    /// Reviews the actor's game in the room. When the actor has no game
    /// there yet, an untimed game is created in the same transaction.
    async fn submit_review(
        &self,
        actor: Option<UserId>,
        room_id: RoomId,
        payload: ReviewPayload,
    ) -> Result<Review, WorkflowError>;
}

pub struct SubmitReviewUseCaseImpl<S: Store, N: NotifyRecommendationWorkflow> {
    store: Arc<S>,
    notify_workflow: Arc<N>,
}

impl<S: Store, N: NotifyRecommendationWorkflow> SubmitReviewUseCaseImpl<S, N> {
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
> SubmitReviewUseCase for SubmitReviewUseCaseImpl<S, N>
{
    async fn submit_review(
        &self,
        actor: Option<UserId>,
        room_id: RoomId,
        payload: ReviewPayload,
    ) -> Result<Review, WorkflowError> {
        let user_id = require_actor(actor)?;
        payload.validate()?;
        let ratings = payload.ratings();

        let mut tx = self.store.begin().await?;
        let user = tx
            .lock_user(user_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::User))?;
        let room = tx
            .lock_room(room_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Room))?;

        let mut usage = user.usage;
        let (game, game_created) = match tx.find_game(user_id, room_id).await? {
            Some(game) => (game, false),
            None => {
                let game = tx
                    .create_game(NewGame::untimed(user_id, room_id, Utc::now()))
                    .await
                    .map_err(WorkflowError::create(ConflictKind::GameExists))?;
                usage = usage.game_created(game.time);
                (game, true)
            }
        };
        if tx.find_review_by_game(game.id).await?.is_some() {
            return Err(WorkflowError::Conflict(ConflictKind::ReviewExists));
        }

        let review = tx
            .create_review(NewReview {
                game_id: game.id,
                room_id,
                user_id,
                ratings,
                scenery: payload.scenery,
                title: payload.title,
                text: payload.text,
                comment_date: Utc::now().date_naive(),
            })
            .await
            .map_err(WorkflowError::create(ConflictKind::ReviewExists))?;

        let room = Room {
            ratings: room.ratings.apply_review(&ratings),
            ..room
        };
        tx.update_room_ratings(room_id, &room.ratings)
            .await
            .map_err(WorkflowError::update(Resource::Room))?;
        tx.update_user_usage(user_id, &usage.review_created())
            .await
            .map_err(WorkflowError::update(Resource::User))?;
        tx.commit().await?;

        if game_created {
            self.notify_workflow
                .room_completed(room_id, user_id, Some(ratings.overall))
                .await;
        } else {
            self.notify_workflow
                .room_rated(room_id, user_id, ratings.overall)
                .await;
        }
        self.notify_workflow.room_changed(&room.snapshot()).await;
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ports::recommendation::SinkCall,
        workflow::{
            game::create::{CreateGameUseCase, CreateGameUseCaseImpl},
            testing::{Fixture, game_payload, review_payload},
        },
    };

    use super::*;

    #[tokio::test]
    async fn test_submit_review_on_existing_game() {
        let f = Fixture::new();
        let room = f.room("Vault").await;
        let user = f.user("a@b.co").await;
        CreateGameUseCaseImpl::new(f.store.clone(), f.notify.clone())
            .create_game(Some(user.id), room.id, game_payload(55))
            .await
            .expect("Failed to create game");
        f.port.clear();

        let review = SubmitReviewUseCaseImpl::new(f.store.clone(), f.notify.clone())
            .submit_review(Some(user.id), room.id, review_payload(9, 0, 2))
            .await
            .expect("Failed to submit review");
        assert_eq!(review.room_id, room.id);
        assert_eq!(review.user_id, user.id);

        let ratings = f.room_state(&room).await.ratings;
        assert_eq!((ratings.overall.sum, ratings.overall.count), (9, 1));
        assert_eq!((ratings.scary.sum, ratings.scary.count), (0, 0));
        assert_eq!((ratings.difficulty.sum, ratings.difficulty.count), (2, 1));

        let usage = f.user_state(&user).await.usage;
        assert_eq!((usage.rooms_count, usage.reviews_count), (1, 1));
        assert_eq!(usage.time_sum, 55);

        let calls = f.port.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], SinkCall::Rating(room.id, user.id, 9));
        assert!(matches!(&calls[1], SinkCall::RoomSnapshot(s) if s.overall_rating == 9.0));
    }

    #[tokio::test]
    async fn test_submit_review_creates_missing_game() {
        let f = Fixture::new();
        let room = f.room("Vault").await;
        let user = f.user("a@b.co").await;

        SubmitReviewUseCaseImpl::new(f.store.clone(), f.notify.clone())
            .submit_review(Some(user.id), room.id, review_payload(6, 4, 1))
            .await
            .expect("Failed to submit review");

        let games = f
            .store
            .query_games_by_user(user.id)
            .await
            .expect("Failed to list games");
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].time, 0);

        let usage = f.user_state(&user).await.usage;
        assert_eq!((usage.rooms_count, usage.reviews_count), (1, 1));
        assert_eq!((usage.time_sum, usage.timed_count), (0, 0));
        let calls = f.port.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], SinkCall::Completion(room.id, user.id, Some(6)));
        assert!(matches!(&calls[1], SinkCall::RoomSnapshot(s) if s.overall_rating == 6.0));
    }

    #[tokio::test]
    async fn test_submit_review_rejects_unknown_room_and_bad_payload() {
        let f = Fixture::new();
        let room = f.room("Vault").await;
        let user = f.user("a@b.co").await;
        let use_case = SubmitReviewUseCaseImpl::new(f.store.clone(), f.notify.clone());

        assert!(matches!(
            use_case
                .submit_review(Some(user.id), RoomId(999), review_payload(5, 0, 0))
                .await,
            Err(WorkflowError::NotFound(Resource::Room))
        ));
        assert!(matches!(
            use_case
                .submit_review(Some(user.id), room.id, review_payload(5, 0, 4))
                .await,
            Err(WorkflowError::Validation(_))
        ));
        assert!(
            f.store
                .query_games_by_user(user.id)
                .await
                .expect("Failed to list games")
                .is_empty()
        );
        assert!(f.port.calls().is_empty());
    }
}
