use std::sync::Arc;

use crate::{
    domain::user::UserSearch,
    ports::store::Store,
    workflow::{WorkflowError, user::UserView},
};

#[async_trait::async_trait]
pub trait SearchUsersUseCase {
    /// Users who opted into search, filtered by name parts.
    async fn search_users(&self, search: UserSearch) -> Result<Vec<UserView>, WorkflowError>;
}

pub struct SearchUsersUseCaseImpl<S: Store> {
    store: Arc<S>,
}

impl<S: Store> SearchUsersUseCaseImpl<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl<S: Store + Send + Sync + 'static> SearchUsersUseCase for SearchUsersUseCaseImpl<S> {
    async fn search_users(&self, search: UserSearch) -> Result<Vec<UserView>, WorkflowError> {
        let users = self.store.search_users(&search).await?;
        Ok(users.into_iter().map(UserView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::{domain::user::NewUser, workflow::testing::Fixture};

    use super::*;

    #[tokio::test]
    async fn test_search_users_skips_private_profiles() {
        let f = Fixture::new();
        for (email, first_name, searchable) in [
            ("grace@navy.mil", "Grace", true),
            ("gracie@navy.mil", "Gracie", false),
            ("ada@b.co", "Ada", true),
        ] {
            f.store
                .create_user(NewUser {
                    email: email.to_string(),
                    first_name: first_name.to_string(),
                    last_name: "Hopper".to_string(),
                    searchable,
                })
                .await
                .expect("Failed to create user");
        }
        let use_case = SearchUsersUseCaseImpl::new(f.store.clone());

        let found = use_case
            .search_users(UserSearch {
                first_name: Some("grac".to_string()),
                last_name: Some("hop".to_string()),
            })
            .await
            .expect("Failed to search users");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].first_name, "Grace");

        let everyone = use_case
            .search_users(UserSearch::default())
            .await
            .expect("Failed to search users");
        assert_eq!(everyone.len(), 2);

        let nobody = use_case
            .search_users(UserSearch {
                first_name: Some("Linus".to_string()),
                last_name: None,
            })
            .await
            .expect("Failed to search users");
        assert!(nobody.is_empty());
    }
}
