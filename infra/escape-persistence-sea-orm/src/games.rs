use escape_persistence_sea_orm_entities::{game, review};
use escape_server_app::domain::{
    GameId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, RoomId, UserId,
    game::{Game, NewGame},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::{create_error, repo_error, retrieve_error, update_error};

pub(crate) fn model_to_game(model: game::Model) -> Game {
    Game {
        id: GameId(model.id),
        user_id: UserId(model.user_id),
        room_id: RoomId(model.room_id),
        time: model.time as u32,
        other_players: model.other_players,
        date: model.date,
    }
}

pub(crate) async fn get_game<C: ConnectionTrait>(
    c: &C,
    game_id: GameId,
) -> Result<Game, RepoRetrieveError> {
    game::Entity::find_by_id(game_id.0)
        .one(c)
        .await
        .map_err(retrieve_error)?
        .map(model_to_game)
        .ok_or(RepoRetrieveError::NotFound)
}

pub(crate) async fn find_game<C: ConnectionTrait>(
    c: &C,
    user_id: UserId,
    room_id: RoomId,
) -> Result<Option<Game>, RepoError> {
    let model = game::Entity::find()
        .filter(game::Column::UserId.eq(user_id.0))
        .filter(game::Column::RoomId.eq(room_id.0))
        .one(c)
        .await
        .map_err(repo_error)?;
    Ok(model.map(model_to_game))
}

pub(crate) async fn games_by_user<C: ConnectionTrait>(
    c: &C,
    user_id: UserId,
) -> Result<Vec<Game>, RepoError> {
    let models = game::Entity::find()
        .filter(game::Column::UserId.eq(user_id.0))
        .order_by_desc(game::Column::Date)
        .all(c)
        .await
        .map_err(repo_error)?;
    Ok(models.into_iter().map(model_to_game).collect())
}

pub(crate) async fn insert_game<C: ConnectionTrait>(
    c: &C,
    game: NewGame,
) -> Result<Game, RepoCreateError> {
    let model = game::ActiveModel {
        id: NotSet,
        user_id: Set(game.user_id.0),
        room_id: Set(game.room_id.0),
        time: Set(game.time as i32),
        other_players: Set(game.other_players),
        date: Set(game.date),
    };
    let model = model.insert(c).await.map_err(create_error)?;
    Ok(model_to_game(model))
}

pub(crate) async fn update_game<C: ConnectionTrait>(
    c: &C,
    game: &Game,
) -> Result<(), RepoUpdateError> {
    let model = game::ActiveModel {
        id: Set(game.id.0),
        user_id: Set(game.user_id.0),
        room_id: Set(game.room_id.0),
        time: Set(game.time as i32),
        other_players: Set(game.other_players.clone()),
        date: Set(game.date),
    };
    model.update(c).await.map_err(update_error)?;
    Ok(())
}

/// Removes the game together with its review, if any.
pub(crate) async fn delete_game<C: ConnectionTrait>(
    c: &C,
    game_id: GameId,
) -> Result<(), RepoError> {
    review::Entity::delete_many()
        .filter(review::Column::GameId.eq(game_id.0))
        .exec(c)
        .await
        .map_err(repo_error)?;
    game::Entity::delete_by_id(game_id.0)
        .exec(c)
        .await
        .map_err(repo_error)?;
    Ok(())
}
