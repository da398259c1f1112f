use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::user::{NewUser, UserPayload},
    ports::store::Store,
    workflow::{
        ConflictKind, WorkflowError, notify::NotifyRecommendationWorkflow, user::UserView,
    },
};

#[async_trait::async_trait]
pub trait RegisterUserUseCase {
    async fn register_user(&self, payload: UserPayload) -> Result<UserView, WorkflowError>;
}

pub struct RegisterUserUseCaseImpl<S: Store, N: NotifyRecommendationWorkflow> {
    store: Arc<S>,
    notify_workflow: Arc<N>,
}

impl<S: Store, N: NotifyRecommendationWorkflow> RegisterUserUseCaseImpl<S, N> {
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
> RegisterUserUseCase for RegisterUserUseCaseImpl<S, N>
{
    async fn register_user(&self, payload: UserPayload) -> Result<UserView, WorkflowError> {
        payload.validate()?;
        let user = self
            .store
            .create_user(NewUser {
                email: payload.email.trim().to_lowercase(),
                first_name: payload.first_name,
                last_name: payload.last_name,
                searchable: payload.searchable,
            })
            .await
            .map_err(WorkflowError::create(ConflictKind::EmailTaken))?;
        log::info!("Registered user {}", user.id);

        self.notify_workflow.user_created(user.id).await;
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::{ports::recommendation::SinkCall, workflow::testing::Fixture};

    use super::*;

    fn payload(email: &str, first_name: &str) -> UserPayload {
        UserPayload {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: "Hopper".to_string(),
            searchable: true,
        }
    }

    #[tokio::test]
    async fn test_register_user_starts_with_zeroed_usage() {
        let f = Fixture::new();
        let use_case = RegisterUserUseCaseImpl::new(f.store.clone(), f.notify.clone());

        let user = use_case
            .register_user(payload("Grace@Navy.mil", "Grace"))
            .await
            .expect("Failed to register user");
        assert_eq!(user.email, "grace@navy.mil");
        assert_eq!((user.rooms_count, user.reviews_count), (0, 0));
        assert_eq!(user.average_time, 0.0);
        assert_eq!(f.port.calls(), vec![SinkCall::UserCreated(user.id)]);
    }

    #[tokio::test]
    async fn test_register_user_rejects_duplicates_and_bad_payloads() {
        let f = Fixture::new();
        let use_case = RegisterUserUseCaseImpl::new(f.store.clone(), f.notify.clone());
        use_case
            .register_user(payload("grace@navy.mil", "Grace"))
            .await
            .expect("Failed to register user");

        assert!(matches!(
            use_case
                .register_user(payload("grace@navy.mil", "Other"))
                .await,
            Err(WorkflowError::Conflict(ConflictKind::EmailTaken))
        ));
        assert!(matches!(
            use_case.register_user(payload("not-an-email", "Grace")).await,
            Err(WorkflowError::Validation(_))
        ));
        assert!(matches!(
            use_case.register_user(payload("ada@b.co", "A")).await,
            Err(WorkflowError::Validation(_))
        ));
        assert_eq!(f.port.calls().len(), 1);
    }
}
