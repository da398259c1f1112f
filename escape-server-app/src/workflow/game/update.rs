use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::{
        GameId, UserId,
        game::{Game, GameUpdate},
    },
    ports::store::{Store, StoreTransaction},
    workflow::{Resource, WorkflowError, ensure_owner, require_actor},
};

#[async_trait::async_trait]
pub trait UpdateGameUseCase {
    async fn update_game(
        &self,
        actor: Option<UserId>,
        game_id: GameId,
        update: GameUpdate,
    ) -> Result<Game, WorkflowError>;
}

pub struct UpdateGameUseCaseImpl<S: Store> {
    store: Arc<S>,
}

impl<S: Store> UpdateGameUseCaseImpl<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl<S: Store + Send + Sync + 'static> UpdateGameUseCase for UpdateGameUseCaseImpl<S> {
    async fn update_game(
        &self,
        actor: Option<UserId>,
        game_id: GameId,
        update: GameUpdate,
    ) -> Result<Game, WorkflowError> {
        let user_id = require_actor(actor)?;
        update.validate()?;

        let mut tx = self.store.begin().await?;
        let user = tx
            .lock_user(user_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::User))?;
        let stored = tx
            .get_game(game_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Game))?;
        ensure_owner(&stored, user_id, Resource::Game)?;

        if update.room_id.is_some_and(|room_id| room_id != stored.room_id) {
            return Err(WorkflowError::Validation(
                "a game cannot be moved to another room".to_string(),
            ));
        }

        let game = Game {
            time: update.time.unwrap_or(stored.time),
            other_players: update.other_players.unwrap_or(stored.other_players.clone()),
            date: update.date.unwrap_or(stored.date),
            ..stored.clone()
        };
        tx.update_game(&game)
            .await
            .map_err(WorkflowError::update(Resource::Game))?;
        tx.update_user_usage(user_id, &user.usage.game_updated(stored.time, game.time))
            .await
            .map_err(WorkflowError::update(Resource::User))?;
        tx.commit().await?;

        Ok(game)
    }
}
