use std::sync::Arc;

use crate::{
    domain::{RoomId, review::Review},
    ports::store::Store,
    workflow::{Resource, WorkflowError},
};

#[async_trait::async_trait]
pub trait ListRoomReviewsUseCase {
    async fn list_room_reviews(&self, room_id: RoomId) -> Result<Vec<Review>, WorkflowError>;
}

pub struct ListRoomReviewsUseCaseImpl<S: Store> {
    store: Arc<S>,
}

impl<S: Store> ListRoomReviewsUseCaseImpl<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl<S: Store + Send + Sync + 'static> ListRoomReviewsUseCase for ListRoomReviewsUseCaseImpl<S> {
    async fn list_room_reviews(&self, room_id: RoomId) -> Result<Vec<Review>, WorkflowError> {
        self.store
            .get_room(room_id)
            .await
            .map_err(WorkflowError::retrieve(Resource::Room))?;
        let mut reviews = self.store.query_reviews_by_room(room_id).await?;
        reviews.sort_by(|a, b| b.comment_date.cmp(&a.comment_date).then(b.id.cmp(&a.id)));
        Ok(reviews)
    }
}
