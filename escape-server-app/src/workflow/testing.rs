use std::sync::Arc;

use crate::{
    domain::{
        game::GamePayload,
        review::ReviewPayload,
        room::{Room, test_room},
        user::{NewUser, User},
    },
    ports::{memory_store::InMemoryStore, recommendation::MockRecommendationPort, store::Store},
    workflow::notify::NotifyRecommendationWorkflowImpl,
};

pub(crate) type TestNotify = NotifyRecommendationWorkflowImpl<MockRecommendationPort>;

pub(crate) struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub port: MockRecommendationPort,
    pub notify: Arc<TestNotify>,
}

impl Fixture {
    pub fn new() -> Self {
        let port = MockRecommendationPort::default();
        Self {
            store: Arc::new(InMemoryStore::new()),
            notify: Arc::new(NotifyRecommendationWorkflowImpl::new(Arc::new(port.clone()))),
            port,
        }
    }

    pub async fn room(&self, name: &str) -> Room {
        self.store.insert_room(test_room(0, name)).await
    }

    pub async fn user(&self, email: &str) -> User {
        self.store
            .create_user(NewUser {
                email: email.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                searchable: true,
            })
            .await
            .expect("Failed to create user")
    }

    pub async fn room_state(&self, room: &Room) -> Room {
        self.store
            .get_room(room.id)
            .await
            .expect("Failed to load room")
    }

    pub async fn user_state(&self, user: &User) -> User {
        self.store
            .get_user(user.id)
            .await
            .expect("Failed to load user")
    }
}

pub(crate) fn game_payload(time: u32) -> GamePayload {
    GamePayload {
        time,
        other_players: String::new(),
        date: None,
    }
}

pub(crate) fn review_payload(overall: u8, scary: u8, difficulty: u8) -> ReviewPayload {
    ReviewPayload {
        overall_rating: overall,
        scary_rating: scary,
        difficulty_rating: difficulty,
        scenery: 5,
        title: "Great".to_string(),
        text: String::new(),
    }
}
