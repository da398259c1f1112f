use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::{UserId, user::ProfileUpdate},
    ports::store::{Store, StoreTransaction},
    workflow::{Resource, WorkflowError, require_actor, user::UserView},
};

#[async_trait::async_trait]
pub trait UpdateProfileUseCase {
    async fn update_profile(
        &self,
        actor: Option<UserId>,
        update: ProfileUpdate,
    ) -> Result<UserView, WorkflowError>;
}

pub struct UpdateProfileUseCaseImpl<S: Store> {
    store: Arc<S>,
}

impl<S: Store> UpdateProfileUseCaseImpl<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl<S: Store + Send + Sync + 'static> UpdateProfileUseCase for UpdateProfileUseCaseImpl<S> {
    async fn update_profile(
        &self,
        actor: Option<UserId>,
        update: ProfileUpdate,
    ) -> Result<UserView, WorkflowError> {
        let user_id = require_actor(actor)?;
        update.validate()?;

        let mut tx = self.store.begin().await?;
        let user = tx
            .lock_user(user_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::User))?;
        let user = update.apply(user);
        tx.update_user_profile(&user)
            .await
            .map_err(WorkflowError::update(Resource::User))?;
        tx.commit().await?;

        log::info!("Updated profile of user {}", user_id);
        Ok(user.into())
    }
}
