use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{
        UserId,
        room::{RoomQuery, RoomSnapshot},
    },
    ports::{
        recommendation::{RecommendationPort, SinkError},
        store::Store,
    },
    workflow::WorkflowError,
};

const SYNC_BATCH_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Bulk pushes of the catalogue and the user base to the recommendation
/// service. Unlike event notifications these surface sink failures.
#[async_trait::async_trait]
pub trait SyncRecommendationsUseCase {
    async fn sync_rooms(&self) -> Result<usize, SyncError>;
    async fn sync_users(&self) -> Result<usize, SyncError>;
}

pub struct SyncRecommendationsUseCaseImpl<S: Store, R: RecommendationPort> {
    store: Arc<S>,
    recommendation_port: Arc<R>,
}

impl<S: Store, R: RecommendationPort> SyncRecommendationsUseCaseImpl<S, R> {
    pub fn new(store: Arc<S>, recommendation_port: Arc<R>) -> Self {
        Self {
            store,
            recommendation_port,
        }
    }
}

#[async_trait::async_trait]
impl<S: Store + Send + Sync + 'static, R: RecommendationPort + Send + Sync + 'static>
    SyncRecommendationsUseCase for SyncRecommendationsUseCaseImpl<S, R>
{
    async fn sync_rooms(&self) -> Result<usize, SyncError> {
        let snapshots: Vec<RoomSnapshot> = self
            .store
            .query_rooms(&RoomQuery::default())
            .await
            .map_err(WorkflowError::from)?
            .iter()
            .map(|room| room.snapshot())
            .collect();
        for batch in snapshots.chunks(SYNC_BATCH_SIZE) {
            self.recommendation_port.sync_room_snapshots(batch).await?;
            log::debug!("Synced a batch of {} rooms", batch.len());
        }
        log::info!("Synced {} rooms", snapshots.len());
        Ok(snapshots.len())
    }

    async fn sync_users(&self) -> Result<usize, SyncError> {
        let user_ids: Vec<UserId> = self
            .store
            .list_users()
            .await
            .map_err(WorkflowError::from)?
            .iter()
            .map(|user| user.id)
            .collect();
        for batch in user_ids.chunks(SYNC_BATCH_SIZE) {
            self.recommendation_port.sync_users(batch).await?;
            log::debug!("Synced a batch of {} users", batch.len());
        }
        log::info!("Synced {} users", user_ids.len());
        Ok(user_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::{ports::recommendation::SinkCall, workflow::testing::Fixture};

    use super::*;

    #[tokio::test]
    async fn test_sync_rooms_in_batches() {
        let f = Fixture::new();
        for i in 0..(SYNC_BATCH_SIZE + 5) {
            f.room(&format!("Room {}", i)).await;
        }
        let use_case =
            SyncRecommendationsUseCaseImpl::new(f.store.clone(), Arc::new(f.port.clone()));

        assert_eq!(
            use_case.sync_rooms().await.expect("Failed to sync"),
            SYNC_BATCH_SIZE + 5
        );
        assert_eq!(
            f.port.calls(),
            vec![
                SinkCall::RoomSnapshots(SYNC_BATCH_SIZE),
                SinkCall::RoomSnapshots(5)
            ]
        );
    }

    #[tokio::test]
    async fn test_sync_users_surfaces_sink_failure() {
        let f = Fixture::new();
        let alice = f.user("a@b.co").await;
        let bob = f.user("c@d.co").await;
        let use_case =
            SyncRecommendationsUseCaseImpl::new(f.store.clone(), Arc::new(f.port.clone()));

        assert_eq!(use_case.sync_users().await.expect("Failed to sync"), 2);
        assert_eq!(
            f.port.calls(),
            vec![SinkCall::Users(vec![alice.id, bob.id])]
        );

        f.port.set_failing(true);
        assert!(matches!(
            use_case.sync_users().await,
            Err(SyncError::Sink(SinkError::Status(503)))
        ));
    }
}
