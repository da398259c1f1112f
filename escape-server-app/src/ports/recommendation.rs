use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use thiserror::Error;

use crate::domain::{RoomId, UserId, room::RoomSnapshot};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("recommendation request failed: {0}")]
    Request(String),
    #[error("recommendation service responded with status {0}")]
    Status(u16),
    #[error("invalid recommendation response: {0}")]
    Decode(String),
}

/// The external recommendation service. Every call may fail on its own;
/// callers treat failures as non-fatal.
#[async_trait::async_trait]
pub trait RecommendationPort {
    async fn notify_user_created(&self, user_id: UserId) -> Result<(), SinkError>;
    async fn notify_view(&self, room_id: RoomId, user_id: UserId) -> Result<(), SinkError>;
    async fn notify_completion(
        &self,
        room_id: RoomId,
        user_id: UserId,
        rating: Option<u8>,
    ) -> Result<(), SinkError>;
    async fn notify_rating(
        &self,
        room_id: RoomId,
        user_id: UserId,
        rating: u8,
    ) -> Result<(), SinkError>;
    async fn notify_rating_update(
        &self,
        room_id: RoomId,
        user_id: UserId,
        new_rating: u8,
    ) -> Result<(), SinkError>;
    async fn cancel_completion(&self, room_id: RoomId, user_id: UserId) -> Result<(), SinkError>;
    async fn cancel_rating(&self, room_id: RoomId, user_id: UserId) -> Result<(), SinkError>;
    async fn sync_room_snapshot(&self, room: &RoomSnapshot) -> Result<(), SinkError>;

    async fn sync_room_snapshots(&self, rooms: &[RoomSnapshot]) -> Result<(), SinkError>;
    async fn sync_users(&self, user_ids: &[UserId]) -> Result<(), SinkError>;
    async fn recommend_rooms(&self, user_id: UserId, count: usize)
    -> Result<Vec<RoomId>, SinkError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum SinkCall {
    UserCreated(UserId),
    View(RoomId, UserId),
    Completion(RoomId, UserId, Option<u8>),
    Rating(RoomId, UserId, u8),
    RatingUpdate(RoomId, UserId, u8),
    CancelCompletion(RoomId, UserId),
    CancelRating(RoomId, UserId),
    RoomSnapshot(RoomSnapshot),
    RoomSnapshots(usize),
    Users(Vec<UserId>),
}

/// Records every call; `set_failing(true)` makes every call error after
/// recording it.
#[derive(Clone, Default)]
pub struct MockRecommendationPort {
    calls: Arc<Mutex<Vec<SinkCall>>>,
    failing: Arc<AtomicBool>,
    recommendations: Arc<Mutex<Vec<RoomId>>>,
}

#[allow(unused)]
impl MockRecommendationPort {
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_recommendations(&self, rooms: Vec<RoomId>) {
        *self.recommendations.lock().unwrap() = rooms;
    }

    fn record(&self, call: SinkCall) -> Result<(), SinkError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::Status(503));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecommendationPort for MockRecommendationPort {
    async fn notify_user_created(&self, user_id: UserId) -> Result<(), SinkError> {
        self.record(SinkCall::UserCreated(user_id))
    }

    async fn notify_view(&self, room_id: RoomId, user_id: UserId) -> Result<(), SinkError> {
        self.record(SinkCall::View(room_id, user_id))
    }

    async fn notify_completion(
        &self,
        room_id: RoomId,
        user_id: UserId,
        rating: Option<u8>,
    ) -> Result<(), SinkError> {
        self.record(SinkCall::Completion(room_id, user_id, rating))
    }

    async fn notify_rating(
        &self,
        room_id: RoomId,
        user_id: UserId,
        rating: u8,
    ) -> Result<(), SinkError> {
        self.record(SinkCall::Rating(room_id, user_id, rating))
    }

    async fn notify_rating_update(
        &self,
        room_id: RoomId,
        user_id: UserId,
        new_rating: u8,
    ) -> Result<(), SinkError> {
        self.record(SinkCall::RatingUpdate(room_id, user_id, new_rating))
    }

    async fn cancel_completion(&self, room_id: RoomId, user_id: UserId) -> Result<(), SinkError> {
        self.record(SinkCall::CancelCompletion(room_id, user_id))
    }

    async fn cancel_rating(&self, room_id: RoomId, user_id: UserId) -> Result<(), SinkError> {
        self.record(SinkCall::CancelRating(room_id, user_id))
    }

    async fn sync_room_snapshot(&self, room: &RoomSnapshot) -> Result<(), SinkError> {
        self.record(SinkCall::RoomSnapshot(room.clone()))
    }

    async fn sync_room_snapshots(&self, rooms: &[RoomSnapshot]) -> Result<(), SinkError> {
        self.record(SinkCall::RoomSnapshots(rooms.len()))
    }

    async fn sync_users(&self, user_ids: &[UserId]) -> Result<(), SinkError> {
        self.record(SinkCall::Users(user_ids.to_vec()))
    }

    async fn recommend_rooms(
        &self,
        _user_id: UserId,
        count: usize,
    ) -> Result<Vec<RoomId>, SinkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::Request("connection refused".to_string()));
        }
        let rooms = self.recommendations.lock().unwrap();
        Ok(rooms.iter().take(count).copied().collect())
    }
}
