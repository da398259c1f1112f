use escape_persistence_sea_orm_entities::room;
use escape_server_app::domain::{
    RepoError, RepoRetrieveError, RepoUpdateError, RoomId, SortOrder,
    rating::{DimensionAggregate, RoomRatings},
    room::{RatingBand, Room, RoomQuery, RoomSortBy},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::{repo_error, retrieve_error, update_error};

pub(crate) fn model_to_room(model: room::Model) -> Room {
    Room {
        id: RoomId(model.id),
        name: model.name,
        description: model.description,
        address: model.address,
        city: model.city,
        owner: model.owner,
        website: model.website,
        duration: model.duration as u32,
        is_kids: model.is_kids,
        is_culinary: model.is_culinary,
        minimal_people_amount: model.minimal_people_amount as u32,
        maximal_people_amount: model.maximal_people_amount as u32,
        ratings: RoomRatings {
            overall: DimensionAggregate {
                sum: model.overall_rating_sum,
                count: model.overall_rating_count as u32,
                average: model.overall_rating_average,
            },
            scary: DimensionAggregate {
                sum: model.scary_rating_sum,
                count: model.scary_rating_count as u32,
                average: model.scary_rating_average,
            },
            difficulty: DimensionAggregate {
                sum: model.difficulty_rating_sum,
                count: model.difficulty_rating_count as u32,
                average: model.difficulty_rating_average,
            },
        },
    }
}

/// Only the aggregate columns are set, the rest of the row is left untouched.
fn ratings_to_model(room_id: RoomId, ratings: &RoomRatings) -> room::ActiveModel {
    room::ActiveModel {
        id: Set(room_id.0),
        overall_rating_sum: Set(ratings.overall.sum),
        overall_rating_count: Set(ratings.overall.count as i32),
        overall_rating_average: Set(ratings.overall.average),
        scary_rating_sum: Set(ratings.scary.sum),
        scary_rating_count: Set(ratings.scary.count as i32),
        scary_rating_average: Set(ratings.scary.average),
        difficulty_rating_sum: Set(ratings.difficulty.sum),
        difficulty_rating_count: Set(ratings.difficulty.count as i32),
        difficulty_rating_average: Set(ratings.difficulty.average),
        ..Default::default()
    }
}

pub(crate) async fn get_room<C: ConnectionTrait>(
    c: &C,
    room_id: RoomId,
    lock: bool,
) -> Result<Room, RepoRetrieveError> {
    let mut select = room::Entity::find_by_id(room_id.0);
    if lock {
        select = select.lock_exclusive();
    }
    select
        .one(c)
        .await
        .map_err(retrieve_error)?
        .map(model_to_room)
        .ok_or(RepoRetrieveError::NotFound)
}

pub(crate) async fn update_room_ratings<C: ConnectionTrait>(
    c: &C,
    room_id: RoomId,
    ratings: &RoomRatings,
) -> Result<(), RepoUpdateError> {
    ratings_to_model(room_id, ratings)
        .update(c)
        .await
        .map_err(update_error)?;
    Ok(())
}

fn band_condition(column: room::Column, bands: Vec<RatingBand>) -> Condition {
    bands.into_iter().fold(Condition::any(), |condition, band| {
        let lower = if band.min_inclusive {
            column.gte(band.min)
        } else {
            column.gt(band.min)
        };
        let upper = if band.max_inclusive {
            column.lte(band.max)
        } else {
            column.lt(band.max)
        };
        condition.add(Condition::all().add(lower).add(upper))
    })
}

pub(crate) async fn query_rooms<C: ConnectionTrait>(
    c: &C,
    query: &RoomQuery,
) -> Result<Vec<Room>, RepoError> {
    let mut db_query = room::Entity::find();

    let difficulty = query.difficulty_bands();
    if !difficulty.is_empty() {
        db_query = db_query.filter(band_condition(
            room::Column::DifficultyRatingAverage,
            difficulty,
        ));
    }
    let scariness = query.scariness_bands();
    if !scariness.is_empty() {
        db_query = db_query.filter(band_condition(room::Column::ScaryRatingAverage, scariness));
    }
    if let Some(city) = &query.city {
        db_query = db_query.filter(room::Column::City.eq(city.as_str()));
    }
    if let Some(owner) = &query.owner {
        db_query = db_query.filter(room::Column::Owner.eq(owner.as_str()));
    }
    if !query.exclude.is_empty() {
        db_query =
            db_query.filter(room::Column::Id.is_not_in(query.exclude.iter().map(|id| id.0)));
    }

    if let Some((order, sort_by)) = query.sort {
        let order_column = match sort_by {
            RoomSortBy::Name => room::Column::Name,
            RoomSortBy::Rating => room::Column::OverallRatingAverage,
        };
        db_query = match order {
            SortOrder::Ascending => db_query.order_by(order_column, Order::Asc),
            SortOrder::Descending => db_query.order_by(order_column, Order::Desc),
        };
    }
    db_query = db_query.order_by(room::Column::Id, Order::Asc);

    if let Some(limit) = query.pagination.limit {
        db_query = db_query.limit(limit as u64);
    }
    if let Some(offset) = query.pagination.offset {
        db_query = db_query.offset(offset as u64);
    }

    let models = db_query.all(c).await.map_err(repo_error)?;
    Ok(models.into_iter().map(model_to_room).collect())
}
