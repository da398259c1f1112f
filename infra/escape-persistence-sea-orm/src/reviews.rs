use escape_persistence_sea_orm_entities::review;
use escape_server_app::domain::{
    GameId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, ReviewId, RoomId,
    UserId,
    rating::ReviewRatings,
    review::{NewReview, Review},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::{create_error, repo_error, retrieve_error, update_error};

pub(crate) fn model_to_review(model: review::Model) -> Review {
    Review {
        id: ReviewId(model.id),
        game_id: GameId(model.game_id),
        room_id: RoomId(model.room_id),
        user_id: UserId(model.user_id),
        ratings: ReviewRatings {
            overall: model.overall_rating as u8,
            scary: model.scary_rating as u8,
            difficulty: model.difficulty_rating as u8,
        },
        scenery: model.scenery as u8,
        title: model.title,
        text: model.text,
        comment_date: model.comment_date,
    }
}

pub(crate) async fn get_review<C: ConnectionTrait>(
    c: &C,
    review_id: ReviewId,
) -> Result<Review, RepoRetrieveError> {
    review::Entity::find_by_id(review_id.0)
        .one(c)
        .await
        .map_err(retrieve_error)?
        .map(model_to_review)
        .ok_or(RepoRetrieveError::NotFound)
}

pub(crate) async fn find_review_by_game<C: ConnectionTrait>(
    c: &C,
    game_id: GameId,
) -> Result<Option<Review>, RepoError> {
    let model = review::Entity::find()
        .filter(review::Column::GameId.eq(game_id.0))
        .one(c)
        .await
        .map_err(repo_error)?;
    Ok(model.map(model_to_review))
}

pub(crate) async fn reviews_by_room<C: ConnectionTrait>(
    c: &C,
    room_id: RoomId,
) -> Result<Vec<Review>, RepoError> {
    let models = review::Entity::find()
        .filter(review::Column::RoomId.eq(room_id.0))
        .order_by_asc(review::Column::Id)
        .all(c)
        .await
        .map_err(repo_error)?;
    Ok(models.into_iter().map(model_to_review).collect())
}

pub(crate) async fn insert_review<C: ConnectionTrait>(
    c: &C,
    review: NewReview,
) -> Result<Review, RepoCreateError> {
    let model = review::ActiveModel {
        id: NotSet,
        game_id: Set(review.game_id.0),
        room_id: Set(review.room_id.0),
        user_id: Set(review.user_id.0),
        overall_rating: Set(review.ratings.overall as i32),
        scary_rating: Set(review.ratings.scary as i32),
        difficulty_rating: Set(review.ratings.difficulty as i32),
        scenery: Set(review.scenery as i32),
        title: Set(review.title),
        text: Set(review.text),
        comment_date: Set(review.comment_date),
    };
    let model = model.insert(c).await.map_err(create_error)?;
    Ok(model_to_review(model))
}

/// Rewrites the rating and commentary columns. Ownership columns never change.
pub(crate) async fn update_review<C: ConnectionTrait>(
    c: &C,
    review: &Review,
) -> Result<(), RepoUpdateError> {
    let model = review::ActiveModel {
        id: Set(review.id.0),
        overall_rating: Set(review.ratings.overall as i32),
        scary_rating: Set(review.ratings.scary as i32),
        difficulty_rating: Set(review.ratings.difficulty as i32),
        scenery: Set(review.scenery as i32),
        title: Set(review.title.clone()),
        text: Set(review.text.clone()),
        ..Default::default()
    };
    model.update(c).await.map_err(update_error)?;
    Ok(())
}

pub(crate) async fn delete_review<C: ConnectionTrait>(
    c: &C,
    review_id: ReviewId,
) -> Result<(), RepoError> {
    review::Entity::delete_by_id(review_id.0)
        .exec(c)
        .await
        .map_err(repo_error)?;
    Ok(())
}
