//! End-to-end runs of the room and user aggregates through the public
//! application, backed by the in-memory store and a recording sink.

use std::sync::Arc;

use crate::{
    Application, build_application,
    domain::{
        ReviewId, UserId,
        game::GameUpdate,
        rating::{DimensionAggregate, RoomRatings},
        room::Room,
        user::User,
    },
    ports::{
        memory_store::InMemoryStore,
        recommendation::{MockRecommendationPort, SinkCall},
        store::Store,
    },
    workflow::{
        ConflictKind, Resource, WorkflowError,
        testing::{Fixture, game_payload, review_payload},
    },
};

struct Scenario {
    fixture: Fixture,
    app: Application,
}

impl Scenario {
    fn new() -> Self {
        let fixture = Fixture::new();
        let app = build_application(fixture.store.clone(), Arc::new(fixture.port.clone()));
        Self { fixture, app }
    }

    fn store(&self) -> &Arc<InMemoryStore> {
        &self.fixture.store
    }

    fn port(&self) -> &MockRecommendationPort {
        &self.fixture.port
    }

    async fn review(&self, user: &User, room: &Room, ratings: (u8, u8, u8)) -> ReviewId {
        let (overall, scary, difficulty) = ratings;
        self.app
            .review_submit_use_case
            .submit_review(
                Some(user.id),
                room.id,
                review_payload(overall, scary, difficulty),
            )
            .await
            .expect("Failed to submit review")
            .id
    }

    async fn ratings(&self, room: &Room) -> RoomRatings {
        self.fixture.room_state(room).await.ratings
    }
}

fn assert_zero_guard(ratings: &RoomRatings) {
    for aggregate in [ratings.overall, ratings.scary, ratings.difficulty] {
        if aggregate.count == 0 {
            assert_eq!(aggregate, DimensionAggregate::default());
        }
    }
}

#[tokio::test]
async fn test_three_reviews_then_sequential_deletion() {
    let s = Scenario::new();
    let room = s.fixture.room("Vault").await;
    let alice = s.fixture.user("alice@escape.co").await;
    let bob = s.fixture.user("bob@escape.co").await;
    let carol = s.fixture.user("carol@escape.co").await;

    let first = s.review(&alice, &room, (9, 7, 2)).await;
    let second = s.review(&bob, &room, (5, 7, 0)).await;
    let third = s.review(&carol, &room, (8, 3, 2)).await;

    let ratings = s.ratings(&room).await;
    assert_eq!(ratings.overall.rounded_average(), 7.3);
    assert_eq!(ratings.scary.rounded_average(), 5.7);
    assert_eq!(ratings.scary.count, 3);
    assert_eq!(ratings.difficulty.rounded_average(), 2.0);
    assert_eq!(ratings.difficulty.count, 2);

    let view = s
        .app
        .room_get_use_case
        .get_room(None, room.id)
        .await
        .expect("Failed to get room");
    assert_eq!(
        (view.overall_rating, view.scary_rating, view.difficulty_rating),
        (7.3, 5.7, 2.0)
    );

    let delete = &s.app.review_delete_use_case;
    delete
        .delete_review(Some(carol.id), third)
        .await
        .expect("Failed to delete review");
    let ratings = s.ratings(&room).await;
    assert_eq!(ratings.overall, DimensionAggregate::from_totals(14, 2));
    assert_eq!(ratings.scary, DimensionAggregate::from_totals(14, 2));
    assert_eq!(ratings.difficulty, DimensionAggregate::from_totals(2, 1));

    delete
        .delete_review(Some(bob.id), second)
        .await
        .expect("Failed to delete review");
    let ratings = s.ratings(&room).await;
    assert_eq!(ratings.overall, DimensionAggregate::from_totals(9, 1));
    assert_eq!(ratings.scary, DimensionAggregate::from_totals(7, 1));
    assert_eq!(ratings.difficulty, DimensionAggregate::from_totals(2, 1));

    delete
        .delete_review(Some(alice.id), first)
        .await
        .expect("Failed to delete review");
    let ratings = s.ratings(&room).await;
    assert_eq!(ratings, RoomRatings::default());
    assert_zero_guard(&ratings);
}

#[tokio::test]
async fn test_reconcile_after_review_churn_is_idempotent() {
    let s = Scenario::new();
    let room = s.fixture.room("Vault").await;
    let alice = s.fixture.user("alice@escape.co").await;
    let bob = s.fixture.user("bob@escape.co").await;

    let review = s.review(&alice, &room, (10, 0, 3)).await;
    s.review(&bob, &room, (3, 6, 0)).await;
    s.app
        .review_update_use_case
        .update_review(Some(alice.id), review, review_payload(6, 9, 0))
        .await
        .expect("Failed to update review");
    let before = s.ratings(&room).await;
    assert_eq!(before.overall, DimensionAggregate::from_totals(9, 2));
    assert_eq!(before.scary, DimensionAggregate::from_totals(15, 2));
    assert_eq!(before.difficulty, DimensionAggregate::default());
    assert_zero_guard(&before);

    let reconcile = &s.app.room_reconcile_use_case;
    assert!(
        !reconcile
            .reconcile_room(room.id)
            .await
            .expect("Failed to reconcile")
    );
    assert!(
        !reconcile
            .reconcile_room(room.id)
            .await
            .expect("Failed to reconcile")
    );
    assert_eq!(s.ratings(&room).await, before);
}

#[tokio::test]
async fn test_five_untimed_games_round_trip() {
    let s = Scenario::new();
    let user = s.fixture.user("alice@escape.co").await;
    let mut games = Vec::new();
    for name in ["Vault", "Crypt", "Attic", "Cellar", "Bunker"] {
        let room = s.fixture.room(name).await;
        let game = s
            .app
            .game_create_use_case
            .create_game(Some(user.id), room.id, game_payload(0))
            .await
            .expect("Failed to create game");
        games.push(game);
    }
    let usage = s.fixture.user_state(&user).await.usage;
    assert_eq!((usage.rooms_count, usage.timed_count), (5, 0));

    for game in games {
        s.app
            .game_delete_use_case
            .delete_game(Some(user.id), game.id)
            .await
            .expect("Failed to delete game");
    }
    let usage = s.fixture.user_state(&user).await.usage;
    assert_eq!((usage.rooms_count, usage.timed_count), (0, 0));
    assert_eq!(usage.time_sum, 0);
}

#[tokio::test]
async fn test_game_duration_transition_round_trip() {
    let s = Scenario::new();
    let room = s.fixture.room("Vault").await;
    let user = s.fixture.user("alice@escape.co").await;
    let game = s
        .app
        .game_create_use_case
        .create_game(Some(user.id), room.id, game_payload(0))
        .await
        .expect("Failed to create game");
    let before = s.fixture.user_state(&user).await.usage;

    let update = |time| GameUpdate {
        time: Some(time),
        ..GameUpdate::default()
    };
    s.app
        .game_update_use_case
        .update_game(Some(user.id), game.id, update(30))
        .await
        .expect("Failed to update game");
    let timed = s.fixture.user_state(&user).await.usage;
    assert_eq!(timed.time_sum, before.time_sum + 30);
    assert_eq!(timed.timed_count, before.timed_count + 1);

    s.app
        .game_update_use_case
        .update_game(Some(user.id), game.id, update(0))
        .await
        .expect("Failed to update game");
    assert_eq!(s.fixture.user_state(&user).await.usage, before);
}

#[tokio::test]
async fn test_duplicate_review_leaves_aggregates_untouched() {
    let s = Scenario::new();
    let room = s.fixture.room("Vault").await;
    let user = s.fixture.user("alice@escape.co").await;
    s.review(&user, &room, (7, 4, 1)).await;
    let ratings = s.ratings(&room).await;
    let usage = s.fixture.user_state(&user).await.usage;

    let result = s
        .app
        .review_submit_use_case
        .submit_review(Some(user.id), room.id, review_payload(2, 2, 2))
        .await;
    assert!(matches!(
        result,
        Err(WorkflowError::Conflict(ConflictKind::ReviewExists))
    ));
    assert_eq!(s.ratings(&room).await, ratings);
    assert_eq!(s.fixture.user_state(&user).await.usage, usage);
}

#[tokio::test]
async fn test_foreign_and_anonymous_review_deletion() {
    let s = Scenario::new();
    let room = s.fixture.room("Vault").await;
    let alice = s.fixture.user("alice@escape.co").await;
    let mallory = s.fixture.user("mallory@escape.co").await;
    let review = s.review(&alice, &room, (8, 0, 0)).await;
    let ratings = s.ratings(&room).await;

    let delete = &s.app.review_delete_use_case;
    assert!(matches!(
        delete.delete_review(Some(mallory.id), review).await,
        Err(WorkflowError::Forbidden(Resource::Review))
    ));
    assert!(matches!(
        delete.delete_review(None, review).await,
        Err(WorkflowError::Unauthenticated)
    ));
    assert!(matches!(
        delete.delete_review(Some(UserId(9999)), review).await,
        Err(WorkflowError::NotFound(Resource::User))
    ));
    assert_eq!(s.ratings(&room).await, ratings);
}

#[tokio::test]
async fn test_sink_outage_does_not_fail_mutations() {
    let s = Scenario::new();
    let room = s.fixture.room("Vault").await;
    let user = s.fixture.user("alice@escape.co").await;
    s.port().set_failing(true);

    let review = s.review(&user, &room, (6, 0, 0)).await;
    assert_eq!(s.ratings(&room).await.overall.count, 1);
    s.app
        .review_delete_use_case
        .delete_review(Some(user.id), review)
        .await
        .expect("Failed to delete review");
    assert_eq!(s.ratings(&room).await, RoomRatings::default());

    let calls = s.port().calls();
    assert!(calls.contains(&SinkCall::Completion(room.id, user.id, Some(6))));
    assert!(calls.contains(&SinkCall::CancelRating(room.id, user.id)));
}

#[tokio::test]
async fn test_failed_commit_leaves_no_auto_created_game() {
    let s = Scenario::new();
    let room = s.fixture.room("Vault").await;
    let user = s.fixture.user("alice@escape.co").await;
    s.store().set_fail_commits(true);

    let result = s
        .app
        .review_submit_use_case
        .submit_review(Some(user.id), room.id, review_payload(9, 9, 3))
        .await;
    assert!(matches!(result, Err(WorkflowError::Storage(_))));

    assert_eq!(s.ratings(&room).await, RoomRatings::default());
    assert_eq!(
        s.fixture.user_state(&user).await.usage,
        Default::default()
    );
    assert!(
        s.store()
            .query_games_by_user(user.id)
            .await
            .expect("Failed to list games")
            .is_empty()
    );
    assert!(s.port().calls().is_empty());

    s.store().set_fail_commits(false);
    s.review(&user, &room, (9, 9, 3)).await;
    assert_eq!(s.ratings(&room).await.overall.count, 1);
}

#[tokio::test]
async fn test_concurrent_reviews_of_one_room_all_count() {
    let s = Scenario::new();
    let room = s.fixture.room("Vault").await;
    let mut users = Vec::new();
    for i in 0..10 {
        users.push(s.fixture.user(&format!("player{}@escape.co", i)).await);
    }

    let submissions = users.iter().enumerate().map(|(i, user)| {
        s.app.review_submit_use_case.submit_review(
            Some(user.id),
            room.id,
            review_payload(i as u8 % 10 + 1, 0, 0),
        )
    });
    for result in futures::future::join_all(submissions).await {
        result.expect("Failed to submit review");
    }

    let ratings = s.ratings(&room).await;
    assert_eq!(ratings.overall, DimensionAggregate::from_totals(55, 10));
    assert_eq!(ratings.overall.rounded_average(), 5.5);
}
