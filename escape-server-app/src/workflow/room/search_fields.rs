use std::{collections::BTreeSet, sync::Arc};

use crate::{
    domain::{RoomId, room::RoomQuery},
    ports::store::Store,
    workflow::WorkflowError,
};

#[derive(Clone, Debug, PartialEq)]
pub struct RoomName {
    pub id: RoomId,
    pub name: String,
}

/// Values a room search form offers: distinct cities and owners, and every
/// room by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchFields {
    pub cities: Vec<String>,
    pub owners: Vec<String>,
    pub rooms: Vec<RoomName>,
}

#[async_trait::async_trait]
pub trait SearchFieldsUseCase {
    async fn search_fields(&self) -> Result<SearchFields, WorkflowError>;
}

pub struct SearchFieldsUseCaseImpl<S: Store> {
    store: Arc<S>,
}

impl<S: Store> SearchFieldsUseCaseImpl<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl<S: Store + Send + Sync + 'static> SearchFieldsUseCase for SearchFieldsUseCaseImpl<S> {
    async fn search_fields(&self) -> Result<SearchFields, WorkflowError> {
        let rooms = self.store.query_rooms(&RoomQuery::default()).await?;

        let mut cities = BTreeSet::new();
        let mut owners = BTreeSet::new();
        let mut names = Vec::with_capacity(rooms.len());
        for room in rooms {
            cities.insert(room.city);
            owners.insert(room.owner);
            names.push(RoomName {
                id: room.id,
                name: room.name,
            });
        }
        names.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(SearchFields {
            cities: cities.into_iter().collect(),
            owners: owners.into_iter().collect(),
            rooms: names,
        })
    }
}
