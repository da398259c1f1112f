use std::sync::Arc;

use crate::{
    domain::UserId,
    ports::store::Store,
    workflow::{WorkflowError, game::GameView, require_actor},
};

#[async_trait::async_trait]
pub trait ListGamesUseCase {
    async fn list_games(&self, actor: Option<UserId>) -> Result<Vec<GameView>, WorkflowError>;
}

pub struct ListGamesUseCaseImpl<S: Store> {
    store: Arc<S>,
}

impl<S: Store> ListGamesUseCaseImpl<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl<S: Store + Send + Sync + 'static> ListGamesUseCase for ListGamesUseCaseImpl<S> {
    async fn list_games(&self, actor: Option<UserId>) -> Result<Vec<GameView>, WorkflowError> {
        let user_id = require_actor(actor)?;
        let games = self.store.query_games_by_user(user_id).await?;
        let mut views = Vec::with_capacity(games.len());
        for game in games {
            let review = self.store.find_review_by_game(game.id).await?;
            views.push(GameView { game, review });
        }
        Ok(views)
    }
}
