use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    domain::{
        RoomId, UserId,
        game::{Game, GamePayload, NewGame},
    },
    ports::store::{Store, StoreTransaction},
    workflow::{
        ConflictKind, Resource, WorkflowError, notify::NotifyRecommendationWorkflow,
        require_actor,
    },
};

#[async_trait::async_trait]
pub trait CreateGameUseCase {
    async fn create_game(
        &self,
        actor: Option<UserId>,
        room_id: RoomId,
        payload: GamePayload,
    ) -> Result<Game, WorkflowError>;
}

pub struct CreateGameUseCaseImpl<S: Store, N: NotifyRecommendationWorkflow> {
    store: Arc<S>,
    notify_workflow: Arc<N>,
}

impl<S: Store, N: NotifyRecommendationWorkflow> CreateGameUseCaseImpl<S, N> {
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
> CreateGameUseCase for CreateGameUseCaseImpl<S, N>
{
    async fn create_game(
        &self,
        actor: Option<UserId>,
        room_id: RoomId,
        payload: GamePayload,
    ) -> Result<Game, WorkflowError> {
        let user_id = require_actor(actor)?;
        payload.validate()?;

        let mut tx = self.store.begin().await?;
        let user = tx
            .lock_user(user_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::User))?;
        tx.lock_room(room_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Room))?;
        if tx.find_game(user_id, room_id).await?.is_some() {
            return Err(WorkflowError::Conflict(ConflictKind::GameExists));
        }

        let game = tx
            .create_game(NewGame {
                user_id,
                room_id,
                time: payload.time,
                other_players: payload.other_players,
                date: payload.date.unwrap_or_else(Utc::now),
            })
            .await
            .map_err(WorkflowError::create(ConflictKind::GameExists))?;
        tx.update_user_usage(user_id, &user.usage.game_created(game.time))
            .await
            .map_err(WorkflowError::update(Resource::User))?;
        tx.commit().await?;

        self.notify_workflow
            .room_completed(room_id, user_id, None)
            .await;
        Ok(game)
    }
}
