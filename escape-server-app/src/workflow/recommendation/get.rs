use std::{collections::HashSet, sync::Arc};

use crate::{
    domain::{
        Pagination, RepoRetrieveError, SortOrder, UserId,
        room::{RoomQuery, RoomSortBy},
    },
    ports::{recommendation::RecommendationPort, store::Store},
    workflow::{
        Resource, WorkflowError, recommendation::RECOMMENDATION_COUNT, require_actor,
        room::{RoomView, rated_rooms},
    },
};

#[async_trait::async_trait]
pub trait GetRecommendationsUseCase {
    /// Best rated rooms the actor has not played yet.
    async fn general_recommendations(
        &self,
        actor: Option<UserId>,
    ) -> Result<Vec<RoomView>, WorkflowError>;

    /// Rooms picked for the actor by the recommendation service. Falls back
    /// to the general recommendations when the service is unavailable.
    async fn personal_recommendations(
        &self,
        actor: Option<UserId>,
    ) -> Result<Vec<RoomView>, WorkflowError>;
}

pub struct GetRecommendationsUseCaseImpl<S: Store, R: RecommendationPort> {
    store: Arc<S>,
    recommendation_port: Arc<R>,
}

impl<S: Store, R: RecommendationPort> GetRecommendationsUseCaseImpl<S, R> {
    pub fn new(store: Arc<S>, recommendation_port: Arc<R>) -> Self {
        Self {
            store,
            recommendation_port,
        }
    }
}

#[async_trait::async_trait]
impl<S: Store + Send + Sync + 'static, R: RecommendationPort + Send + Sync + 'static>
    GetRecommendationsUseCase for GetRecommendationsUseCaseImpl<S, R>
{
    async fn general_recommendations(
        &self,
        actor: Option<UserId>,
    ) -> Result<Vec<RoomView>, WorkflowError> {
        let exclude = match actor {
            Some(user_id) => self
                .store
                .query_games_by_user(user_id)
                .await?
                .into_iter()
                .map(|game| game.room_id)
                .collect(),
            None => Vec::new(),
        };
        let query = RoomQuery {
            exclude,
            sort: Some((SortOrder::Descending, RoomSortBy::Rating)),
            pagination: Pagination {
                offset: None,
                limit: Some(RECOMMENDATION_COUNT),
            },
            ..RoomQuery::default()
        };
        let rooms = self.store.query_rooms(&query).await?;
        Ok(rooms
            .into_iter()
            .map(|room| RoomView::new(room, false))
            .collect())
    }

    async fn personal_recommendations(
        &self,
        actor: Option<UserId>,
    ) -> Result<Vec<RoomView>, WorkflowError> {
        let user_id = require_actor(actor)?;
        let room_ids = match self
            .recommendation_port
            .recommend_rooms(user_id, RECOMMENDATION_COUNT)
            .await
        {
            Ok(room_ids) => room_ids,
            Err(e) => {
                log::warn!(
                    "Recommendation service unavailable for user {}, using general recommendations: {}",
                    user_id,
                    e
                );
                return self.general_recommendations(actor).await;
            }
        };

        let rated: HashSet<_> = rated_rooms(self.store.as_ref(), user_id).await?;
        let mut views = Vec::with_capacity(room_ids.len());
        for room_id in room_ids {
            match self.store.get_room(room_id).await {
                Ok(room) => {
                    let already_rated = rated.contains(&room.id);
                    views.push(RoomView::new(room, already_rated));
                }
                Err(RepoRetrieveError::NotFound) => {
                    log::debug!("Recommended room {} no longer exists", room_id);
                }
                Err(e) => return Err(WorkflowError::retrieve(Resource::Room)(e)),
            }
        }
        Ok(views)
    }
}
