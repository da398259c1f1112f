use escape_persistence_sea_orm_entities::user;
use escape_server_app::domain::{
    RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, UserId,
    usage::UserUsage,
    user::{NewUser, User, UserSearch},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{create_error, repo_error, retrieve_error, update_error};

pub(crate) fn model_to_user(model: user::Model) -> User {
    User {
        id: UserId(model.id),
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        searchable: model.searchable,
        usage: UserUsage {
            rooms_count: model.rooms_count as u32,
            reviews_count: model.reviews_count as u32,
            time_sum: model.time_sum,
            timed_count: model.timed_count as u32,
        },
    }
}

fn usage_to_model(user_id: UserId, usage: &UserUsage) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(user_id.0),
        rooms_count: Set(usage.rooms_count as i32),
        reviews_count: Set(usage.reviews_count as i32),
        time_sum: Set(usage.time_sum),
        timed_count: Set(usage.timed_count as i32),
        ..Default::default()
    }
}

pub(crate) async fn get_user<C: ConnectionTrait>(
    c: &C,
    user_id: UserId,
    lock: bool,
) -> Result<User, RepoRetrieveError> {
    let mut select = user::Entity::find_by_id(user_id.0);
    if lock {
        select = select.lock_exclusive();
    }
    select
        .one(c)
        .await
        .map_err(retrieve_error)?
        .map(model_to_user)
        .ok_or(RepoRetrieveError::NotFound)
}

pub(crate) async fn list_users<C: ConnectionTrait>(c: &C) -> Result<Vec<User>, RepoError> {
    let models = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(c)
        .await
        .map_err(repo_error)?;
    Ok(models.into_iter().map(model_to_user).collect())
}

/// LIKE under the default collation, so name parts match ignoring case.
pub(crate) async fn search_users<C: ConnectionTrait>(
    c: &C,
    search: &UserSearch,
) -> Result<Vec<User>, RepoError> {
    let mut select = user::Entity::find().filter(user::Column::Searchable.eq(true));
    if let Some(first_name) = &search.first_name {
        select = select.filter(user::Column::FirstName.contains(first_name));
    }
    if let Some(last_name) = &search.last_name {
        select = select.filter(user::Column::LastName.contains(last_name));
    }
    let models = select
        .order_by_asc(user::Column::Id)
        .all(c)
        .await
        .map_err(repo_error)?;
    Ok(models.into_iter().map(model_to_user).collect())
}

pub(crate) async fn insert_user<C: ConnectionTrait>(
    c: &C,
    user: NewUser,
) -> Result<User, RepoCreateError> {
    let model = user::ActiveModel {
        id: NotSet,
        email: Set(user.email),
        first_name: Set(user.first_name),
        last_name: Set(user.last_name),
        searchable: Set(user.searchable),
        rooms_count: Set(0),
        reviews_count: Set(0),
        time_sum: Set(0),
        timed_count: Set(0),
    };
    let model = model.insert(c).await.map_err(create_error)?;
    Ok(model_to_user(model))
}

pub(crate) async fn update_user_usage<C: ConnectionTrait>(
    c: &C,
    user_id: UserId,
    usage: &UserUsage,
) -> Result<(), RepoUpdateError> {
    usage_to_model(user_id, usage)
        .update(c)
        .await
        .map_err(update_error)?;
    Ok(())
}

pub(crate) async fn update_user_profile<C: ConnectionTrait>(
    c: &C,
    user: &User,
) -> Result<(), RepoUpdateError> {
    let model = user::ActiveModel {
        id: Set(user.id.0),
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        searchable: Set(user.searchable),
        ..Default::default()
    };
    model.update(c).await.map_err(update_error)?;
    Ok(())
}
