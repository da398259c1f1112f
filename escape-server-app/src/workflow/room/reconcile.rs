use std::sync::Arc;

use crate::{
    domain::{
        RoomId,
        reconcile::reconcile_room_ratings,
        room::{Room, RoomQuery},
    },
    ports::store::{Store, StoreTransaction},
    workflow::{Resource, WorkflowError, notify::NotifyRecommendationWorkflow},
};

/// Rebuilds stored room aggregates from the reviews they summarise.
#[async_trait::async_trait]
pub trait ReconcileRoomsUseCase {
    /// Returns whether the stored aggregates differed from the recount.
    async fn reconcile_room(&self, room_id: RoomId) -> Result<bool, WorkflowError>;
    /// Returns the number of rooms whose aggregates were repaired.
    async fn reconcile_all(&self) -> Result<usize, WorkflowError>;
}

pub struct ReconcileRoomsUseCaseImpl<S: Store, N: NotifyRecommendationWorkflow> {
    store: Arc<S>,
    notify_workflow: Arc<N>,
}

impl<S: Store, N: NotifyRecommendationWorkflow> ReconcileRoomsUseCaseImpl<S, N> {
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
> ReconcileRoomsUseCase for ReconcileRoomsUseCaseImpl<S, N>
{
    async fn reconcile_room(&self, room_id: RoomId) -> Result<bool, WorkflowError> {
        let mut tx = self.store.begin().await?;
        let room = tx
            .lock_room(room_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Room))?;
        let reviews = tx.query_reviews_by_room(room_id).await?;
        let ratings = reconcile_room_ratings(reviews.iter().map(|r| &r.ratings));
        if ratings == room.ratings {
            return Ok(false);
        }

        log::info!(
            "Repairing ratings of room {}: overall {}/{} -> {}/{}",
            room_id,
            room.ratings.overall.sum,
            room.ratings.overall.count,
            ratings.overall.sum,
            ratings.overall.count
        );
        tx.update_room_ratings(room_id, &ratings)
            .await
            .map_err(WorkflowError::update(Resource::Room))?;
        tx.commit().await?;

        let room = Room { ratings, ..room };
        self.notify_workflow.room_changed(&room.snapshot()).await;
        Ok(true)
    }

    async fn reconcile_all(&self) -> Result<usize, WorkflowError> {
        let rooms = self.store.query_rooms(&RoomQuery::default()).await?;
        let mut repaired = 0;
        for room in &rooms {
            if self.reconcile_room(room.id).await? {
                repaired += 1;
            }
        }
        log::info!("Reconciled {} rooms, {} repaired", rooms.len(), repaired);
        Ok(repaired)
    }
}
