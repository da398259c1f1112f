use std::{sync::Arc, time::Duration};

use escape_server_app::{
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
use sea_orm::{DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait};

use crate::{cache::RowCache, create_db_pool, games, repo_error, reviews, rooms, users};

const CACHE_CAPACITY: u64 = 10_000;
const CACHE_TIME_TO_LIVE: Duration = Duration::from_secs(60 * 60);

/// [`Store`] over the MariaDB pool. Committed rooms and users are cached
/// and evicted when a transaction that touched them commits.
///
/// Transactions run at READ COMMITTED. Every read inside one, including the
/// review recount after a room lock is granted, sees the rows committed by
/// the previous holder of that lock rather than the transaction's first
/// snapshot.
pub struct SeaOrmStore {
    db: DatabaseConnection,
    room_cache: Arc<RowCache<RoomId, Room>>,
    user_cache: Arc<RowCache<UserId, User>>,
}

impl SeaOrmStore {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self::with_connection(db)
    }

    pub fn with_connection(db: DatabaseConnection) -> Self {
        Self {
            db,
            room_cache: Arc::new(RowCache::new(CACHE_CAPACITY, CACHE_TIME_TO_LIVE)),
            user_cache: Arc::new(RowCache::new(CACHE_CAPACITY, CACHE_TIME_TO_LIVE)),
        }
    }
}

pub struct SeaOrmTransaction {
    tx: DatabaseTransaction,
    room_cache: Arc<RowCache<RoomId, Room>>,
    user_cache: Arc<RowCache<UserId, User>>,
    touched_rooms: Vec<RoomId>,
    touched_users: Vec<UserId>,
}

#[async_trait::async_trait]
impl Store for SeaOrmStore {
    type Transaction = SeaOrmTransaction;

    async fn begin(&self) -> Result<SeaOrmTransaction, RepoError> {
        let tx = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), None)
            .await
            .map_err(repo_error)?;
        Ok(SeaOrmTransaction {
            tx,
            room_cache: self.room_cache.clone(),
            user_cache: self.user_cache.clone(),
            touched_rooms: Vec::new(),
            touched_users: Vec::new(),
        })
    }

    async fn get_room(&self, room_id: RoomId) -> Result<Room, RepoRetrieveError> {
        if let Some(room) = self.room_cache.get(&room_id) {
            return Ok(room);
        }
        let epoch = self.room_cache.epoch();
        let room = rooms::get_room(&self.db, room_id, false).await?;
        self.room_cache.fill(room_id, room.clone(), epoch);
        Ok(room)
    }

    async fn query_rooms(&self, query: &RoomQuery) -> Result<Vec<Room>, RepoError> {
        rooms::query_rooms(&self.db, query).await
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, RepoRetrieveError> {
        if let Some(user) = self.user_cache.get(&user_id) {
            return Ok(user);
        }
        let epoch = self.user_cache.epoch();
        let user = users::get_user(&self.db, user_id, false).await?;
        self.user_cache.fill(user_id, user.clone(), epoch);
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        users::list_users(&self.db).await
    }

    async fn search_users(&self, search: &UserSearch) -> Result<Vec<User>, RepoError> {
        users::search_users(&self.db, search).await
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepoCreateError> {
        users::insert_user(&self.db, user).await
    }

    async fn query_games_by_user(&self, user_id: UserId) -> Result<Vec<Game>, RepoError> {
        games::games_by_user(&self.db, user_id).await
    }

    async fn query_reviews_by_room(&self, room_id: RoomId) -> Result<Vec<Review>, RepoError> {
        reviews::reviews_by_room(&self.db, room_id).await
    }

    async fn find_review_by_game(&self, game_id: GameId) -> Result<Option<Review>, RepoError> {
        reviews::find_review_by_game(&self.db, game_id).await
    }
}

#[async_trait::async_trait]
impl StoreTransaction for SeaOrmTransaction {
    async fn lock_room(&mut self, room_id: RoomId) -> Result<Room, RepoRetrieveError> {
        rooms::get_room(&self.tx, room_id, true).await
    }

    async fn lock_user(&mut self, user_id: UserId) -> Result<User, RepoRetrieveError> {
        users::get_user(&self.tx, user_id, true).await
    }

    async fn update_room_ratings(
        &mut self,
        room_id: RoomId,
        ratings: &RoomRatings,
    ) -> Result<(), RepoUpdateError> {
        rooms::update_room_ratings(&self.tx, room_id, ratings).await?;
        self.touched_rooms.push(room_id);
        Ok(())
    }

    async fn update_user_usage(
        &mut self,
        user_id: UserId,
        usage: &UserUsage,
    ) -> Result<(), RepoUpdateError> {
        users::update_user_usage(&self.tx, user_id, usage).await?;
        self.touched_users.push(user_id);
        Ok(())
    }

    async fn update_user_profile(&mut self, user: &User) -> Result<(), RepoUpdateError> {
        users::update_user_profile(&self.tx, user).await?;
        self.touched_users.push(user.id);
        Ok(())
    }

    async fn get_game(&mut self, game_id: GameId) -> Result<Game, RepoRetrieveError> {
        games::get_game(&self.tx, game_id).await
    }

    async fn find_game(
        &mut self,
        user_id: UserId,
        room_id: RoomId,
    ) -> Result<Option<Game>, RepoError> {
        games::find_game(&self.tx, user_id, room_id).await
    }

    async fn create_game(&mut self, game: NewGame) -> Result<Game, RepoCreateError> {
        games::insert_game(&self.tx, game).await
    }

    async fn update_game(&mut self, game: &Game) -> Result<(), RepoUpdateError> {
        games::update_game(&self.tx, game).await
    }

    async fn delete_game(&mut self, game_id: GameId) -> Result<(), RepoError> {
        games::delete_game(&self.tx, game_id).await
    }

    async fn get_review(&mut self, review_id: ReviewId) -> Result<Review, RepoRetrieveError> {
        reviews::get_review(&self.tx, review_id).await
    }

    async fn find_review_by_game(&mut self, game_id: GameId) -> Result<Option<Review>, RepoError> {
        reviews::find_review_by_game(&self.tx, game_id).await
    }

    async fn create_review(&mut self, review: NewReview) -> Result<Review, RepoCreateError> {
        reviews::insert_review(&self.tx, review).await
    }

    async fn update_review(&mut self, review: &Review) -> Result<(), RepoUpdateError> {
        reviews::update_review(&self.tx, review).await
    }

    async fn delete_review(&mut self, review_id: ReviewId) -> Result<(), RepoError> {
        reviews::delete_review(&self.tx, review_id).await
    }

    async fn query_reviews_by_room(&mut self, room_id: RoomId) -> Result<Vec<Review>, RepoError> {
        reviews::reviews_by_room(&self.tx, room_id).await
    }

    async fn commit(self) -> Result<(), RepoError> {
        self.tx.commit().await.map_err(|e| {
            log::error!("Failed to commit transaction: {}", e);
            repo_error(e)
        })?;
        if !self.touched_rooms.is_empty() {
            self.room_cache.evict(&self.touched_rooms);
        }
        if !self.touched_users.is_empty() {
            self.user_cache.evict(&self.touched_users);
        }
        Ok(())
    }
}
