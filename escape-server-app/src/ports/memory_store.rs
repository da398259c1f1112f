use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    domain::{
        GameId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, ReviewId, RoomId,
        UserId,
        game::{Game, NewGame},
        rating::RoomRatings,
        review::{NewReview, Review},
        room::{Room, RoomQuery},
        usage::UserUsage,
        user::{NewUser, User, UserSearch},
    },
    ports::store::{Store, StoreTransaction},
};

#[derive(Clone, Default)]
struct StoreState {
    rooms: BTreeMap<RoomId, Room>,
    users: BTreeMap<UserId, User>,
    games: BTreeMap<GameId, Game>,
    reviews: BTreeMap<ReviewId, Review>,
    last_id: i64,
}

impl StoreState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn reviews_by_room(&self, room_id: RoomId) -> Vec<Review> {
        self.reviews
            .values()
            .filter(|r| r.room_id == room_id)
            .cloned()
            .collect()
    }

    fn review_by_game(&self, game_id: GameId) -> Option<Review> {
        self.reviews.values().find(|r| r.game_id == game_id).cloned()
    }
}

/// A [`Store`] kept in process memory. Transactions are serialized: a
/// transaction holds the whole store until it is committed or dropped, and
/// works on a staged copy that only replaces the committed state on commit.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    fail_commits: Arc<AtomicBool>,
}

#[allow(unused)]
impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_room(&self, mut room: Room) -> Room {
        let mut state = self.state.lock().await;
        room.id = RoomId(state.next_id());
        state.rooms.insert(room.id, room.clone());
        room
    }

    /// Overwrites a room as-is, including its aggregates.
    pub async fn put_room(&self, room: Room) {
        self.state.lock().await.rooms.insert(room.id, room);
    }

    /// Makes every following commit fail, leaving the committed state untouched.
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }
}

pub struct InMemoryTransaction {
    committed: OwnedMutexGuard<StoreState>,
    staged: StoreState,
    fail_commit: bool,
}

#[async_trait::async_trait]
impl Store for InMemoryStore {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction, RepoError> {
        let committed = self.state.clone().lock_owned().await;
        let staged = committed.clone();
        Ok(InMemoryTransaction {
            committed,
            staged,
            fail_commit: self.fail_commits.load(Ordering::SeqCst),
        })
    }

    async fn get_room(&self, room_id: RoomId) -> Result<Room, RepoRetrieveError> {
        let state = self.state.lock().await;
        state
            .rooms
            .get(&room_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn query_rooms(&self, query: &RoomQuery) -> Result<Vec<Room>, RepoError> {
        let state = self.state.lock().await;
        Ok(query.apply(state.rooms.values().cloned()))
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, RepoRetrieveError> {
        let state = self.state.lock().await;
        state
            .users
            .get(&user_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let state = self.state.lock().await;
        Ok(state.users.values().cloned().collect())
    }

    async fn search_users(&self, search: &UserSearch) -> Result<Vec<User>, RepoError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .filter(|u| search.matches(u))
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepoCreateError> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(RepoCreateError::Conflict);
        }
        let user = User {
            id: UserId(state.next_id()),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            searchable: user.searchable,
            usage: UserUsage::default(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn query_games_by_user(&self, user_id: UserId) -> Result<Vec<Game>, RepoError> {
        let state = self.state.lock().await;
        Ok(state
            .games
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn query_reviews_by_room(&self, room_id: RoomId) -> Result<Vec<Review>, RepoError> {
        Ok(self.state.lock().await.reviews_by_room(room_id))
    }

    async fn find_review_by_game(&self, game_id: GameId) -> Result<Option<Review>, RepoError> {
        Ok(self.state.lock().await.review_by_game(game_id))
    }
}

#[async_trait::async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn lock_room(&mut self, room_id: RoomId) -> Result<Room, RepoRetrieveError> {
        self.staged
            .rooms
            .get(&room_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn lock_user(&mut self, user_id: UserId) -> Result<User, RepoRetrieveError> {
        self.staged
            .users
            .get(&user_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn update_room_ratings(
        &mut self,
        room_id: RoomId,
        ratings: &RoomRatings,
    ) -> Result<(), RepoUpdateError> {
        let room = self
            .staged
            .rooms
            .get_mut(&room_id)
            .ok_or(RepoUpdateError::NotFound)?;
        room.ratings = *ratings;
        Ok(())
    }

    async fn update_user_usage(
        &mut self,
        user_id: UserId,
        usage: &UserUsage,
    ) -> Result<(), RepoUpdateError> {
        let user = self
            .staged
            .users
            .get_mut(&user_id)
            .ok_or(RepoUpdateError::NotFound)?;
        user.usage = *usage;
        Ok(())
    }

    async fn update_user_profile(&mut self, user: &User) -> Result<(), RepoUpdateError> {
        let stored = self
            .staged
            .users
            .get_mut(&user.id)
            .ok_or(RepoUpdateError::NotFound)?;
        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.searchable = user.searchable;
        Ok(())
    }

    async fn get_game(&mut self, game_id: GameId) -> Result<Game, RepoRetrieveError> {
        self.staged
            .games
            .get(&game_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn find_game(
        &mut self,
        user_id: UserId,
        room_id: RoomId,
    ) -> Result<Option<Game>, RepoError> {
        Ok(self
            .staged
            .games
            .values()
            .find(|g| g.user_id == user_id && g.room_id == room_id)
            .cloned())
    }

    async fn create_game(&mut self, game: NewGame) -> Result<Game, RepoCreateError> {
        if self
            .staged
            .games
            .values()
            .any(|g| g.user_id == game.user_id && g.room_id == game.room_id)
        {
            return Err(RepoCreateError::Conflict);
        }
        let game = Game {
            id: GameId(self.staged.next_id()),
            user_id: game.user_id,
            room_id: game.room_id,
            time: game.time,
            other_players: game.other_players,
            date: game.date,
        };
        self.staged.games.insert(game.id, game.clone());
        Ok(game)
    }

    async fn update_game(&mut self, game: &Game) -> Result<(), RepoUpdateError> {
        let stored = self
            .staged
            .games
            .get_mut(&game.id)
            .ok_or(RepoUpdateError::NotFound)?;
        *stored = game.clone();
        Ok(())
    }

    async fn delete_game(&mut self, game_id: GameId) -> Result<(), RepoError> {
        self.staged.games.remove(&game_id);
        self.staged.reviews.retain(|_, r| r.game_id != game_id);
        Ok(())
    }

    async fn get_review(&mut self, review_id: ReviewId) -> Result<Review, RepoRetrieveError> {
        self.staged
            .reviews
            .get(&review_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn find_review_by_game(&mut self, game_id: GameId) -> Result<Option<Review>, RepoError> {
        Ok(self.staged.review_by_game(game_id))
    }

    async fn create_review(&mut self, review: NewReview) -> Result<Review, RepoCreateError> {
        if self.staged.review_by_game(review.game_id).is_some() {
            return Err(RepoCreateError::Conflict);
        }
        let review = Review {
            id: ReviewId(self.staged.next_id()),
            game_id: review.game_id,
            room_id: review.room_id,
            user_id: review.user_id,
            ratings: review.ratings,
            scenery: review.scenery,
            title: review.title,
            text: review.text,
            comment_date: review.comment_date,
        };
        self.staged.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn update_review(&mut self, review: &Review) -> Result<(), RepoUpdateError> {
        let stored = self
            .staged
            .reviews
            .get_mut(&review.id)
            .ok_or(RepoUpdateError::NotFound)?;
        *stored = review.clone();
        Ok(())
    }

    async fn delete_review(&mut self, review_id: ReviewId) -> Result<(), RepoError> {
        self.staged.reviews.remove(&review_id);
        Ok(())
    }

    async fn query_reviews_by_room(&mut self, room_id: RoomId) -> Result<Vec<Review>, RepoError> {
        Ok(self.staged.reviews_by_room(room_id))
    }

    async fn commit(mut self) -> Result<(), RepoError> {
        if self.fail_commit {
            return Err(RepoError::StorageError("commit rejected".to_string()));
        }
        *self.committed = self.staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::domain::room::test_room;

    use super::*;

    #[tokio::test]
    async fn test_uncommitted_transaction_is_discarded() {
        let store = InMemoryStore::new();
        let room = store.insert_room(test_room(0, "Vault")).await;
        let user = store
            .create_user(NewUser {
                email: "a@b.co".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                searchable: true,
            })
            .await
            .unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.create_game(NewGame::untimed(user.id, room.id, Utc::now()))
                .await
                .unwrap();
        }
        assert!(store.query_games_by_user(user.id).await.unwrap().is_empty());

        let mut tx = store.begin().await.unwrap();
        tx.create_game(NewGame::untimed(user.id, room.id, Utc::now()))
            .await
            .unwrap();
        assert!(matches!(
            tx.create_game(NewGame::untimed(user.id, room.id, Utc::now()))
                .await,
            Err(RepoCreateError::Conflict)
        ));
        tx.commit().await.unwrap();
        assert_eq!(store.query_games_by_user(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_committed_state() {
        let store = InMemoryStore::new();
        let room = store.insert_room(test_room(0, "Vault")).await;
        store.set_fail_commits(true);

        let mut tx = store.begin().await.unwrap();
        let mut ratings = RoomRatings::default();
        ratings.overall.count = 1;
        tx.update_room_ratings(room.id, &ratings).await.unwrap();
        assert!(tx.commit().await.is_err());

        assert_eq!(
            store.get_room(room.id).await.unwrap().ratings,
            RoomRatings::default()
        );
    }
}
