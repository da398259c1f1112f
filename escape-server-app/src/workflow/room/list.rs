use std::{collections::HashSet, sync::Arc};

use crate::{
    domain::{UserId, room::RoomQuery},
    ports::store::Store,
    workflow::{
        WorkflowError,
        room::{RoomView, rated_rooms},
    },
};

#[async_trait::async_trait]
pub trait ListRoomsUseCase {
    async fn list_rooms(
        &self,
        actor: Option<UserId>,
        query: RoomQuery,
    ) -> Result<Vec<RoomView>, WorkflowError>;
}

pub struct ListRoomsUseCaseImpl<S: Store> {
    store: Arc<S>,
}

impl<S: Store> ListRoomsUseCaseImpl<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl<S: Store + Send + Sync + 'static> ListRoomsUseCase for ListRoomsUseCaseImpl<S> {
    async fn list_rooms(
        &self,
        actor: Option<UserId>,
        query: RoomQuery,
    ) -> Result<Vec<RoomView>, WorkflowError> {
        let rated = match actor {
            Some(user_id) => rated_rooms(self.store.as_ref(), user_id).await?,
            None => HashSet::new(),
        };
        let rooms = self.store.query_rooms(&query).await?;
        Ok(rooms
            .into_iter()
            .map(|room| {
                let already_rated = rated.contains(&room.id);
                RoomView::new(room, already_rated)
            })
            .collect())
    }
}
