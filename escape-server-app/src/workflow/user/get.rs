use std::sync::Arc;

use crate::{
    domain::UserId,
    ports::store::Store,
    workflow::{Resource, WorkflowError, user::UserView},
};

#[async_trait::async_trait]
pub trait GetUserUseCase {
    async fn get_user(&self, user_id: UserId) -> Result<UserView, WorkflowError>;
}

pub struct GetUserUseCaseImpl<S: Store> {
    store: Arc<S>,
}

impl<S: Store> GetUserUseCaseImpl<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl<S: Store + Send + Sync + 'static> GetUserUseCase for GetUserUseCaseImpl<S> {
    async fn get_user(&self, user_id: UserId) -> Result<UserView, WorkflowError> {
        let user = self
            .store
            .get_user(user_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::User))?;
        Ok(user.into())
    }
}
