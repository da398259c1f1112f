use crate::domain::{
    GameId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, ReviewId, RoomId,
    UserId,
    game::{Game, NewGame},
    rating::RoomRatings,
    review::{NewReview, Review},
    room::{Room, RoomQuery},
    usage::UserUsage,
    user::{NewUser, User, UserSearch},
};

/// Persistent storage of rooms, users, games and reviews.
///
/// Reads on the store itself see committed state only. Every mutation goes
/// through a [`StoreTransaction`].
#[async_trait::async_trait]
pub trait Store {
    type Transaction: StoreTransaction + Send;

    async fn begin(&self) -> Result<Self::Transaction, RepoError>;

    async fn get_room(&self, room_id: RoomId) -> Result<Room, RepoRetrieveError>;
    async fn query_rooms(&self, query: &RoomQuery) -> Result<Vec<Room>, RepoError>;
    async fn get_user(&self, user_id: UserId) -> Result<User, RepoRetrieveError>;
    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
    async fn search_users(&self, search: &UserSearch) -> Result<Vec<User>, RepoError>;
    async fn create_user(&self, user: NewUser) -> Result<User, RepoCreateError>;
    async fn query_games_by_user(&self, user_id: UserId) -> Result<Vec<Game>, RepoError>;
    async fn query_reviews_by_room(&self, room_id: RoomId) -> Result<Vec<Review>, RepoError>;
    async fn find_review_by_game(&self, game_id: GameId) -> Result<Option<Review>, RepoError>;
}

/// One atomic unit of work. Dropping a transaction without calling
/// [`StoreTransaction::commit`] discards every change made through it.
///
/// `lock_user` and `lock_room` hold the row exclusively until the
/// transaction ends. Callers lock the acting user first and then at most one
/// room; games and reviews are only ever mutated under their owner's lock.
#[async_trait::async_trait]
pub trait StoreTransaction: Send {
    async fn lock_room(&mut self, room_id: RoomId) -> Result<Room, RepoRetrieveError>;
    async fn lock_user(&mut self, user_id: UserId) -> Result<User, RepoRetrieveError>;
    async fn update_room_ratings(
        &mut self,
        room_id: RoomId,
        ratings: &RoomRatings,
    ) -> Result<(), RepoUpdateError>;
    async fn update_user_usage(
        &mut self,
        user_id: UserId,
        usage: &UserUsage,
    ) -> Result<(), RepoUpdateError>;
    /// Writes names and the search opt-in. Email and counters are untouched.
    async fn update_user_profile(&mut self, user: &User) -> Result<(), RepoUpdateError>;

    async fn get_game(&mut self, game_id: GameId) -> Result<Game, RepoRetrieveError>;
    async fn find_game(
        &mut self,
        user_id: UserId,
        room_id: RoomId,
    ) -> Result<Option<Game>, RepoError>;
    async fn create_game(&mut self, game: NewGame) -> Result<Game, RepoCreateError>;
    async fn update_game(&mut self, game: &Game) -> Result<(), RepoUpdateError>;
    async fn delete_game(&mut self, game_id: GameId) -> Result<(), RepoError>;

    async fn get_review(&mut self, review_id: ReviewId) -> Result<Review, RepoRetrieveError>;
    async fn find_review_by_game(&mut self, game_id: GameId) -> Result<Option<Review>, RepoError>;
    async fn create_review(&mut self, review: NewReview) -> Result<Review, RepoCreateError>;
    async fn update_review(&mut self, review: &Review) -> Result<(), RepoUpdateError>;
    async fn delete_review(&mut self, review_id: ReviewId) -> Result<(), RepoError>;
    async fn query_reviews_by_room(&mut self, room_id: RoomId) -> Result<Vec<Review>, RepoError>;

    async fn commit(self) -> Result<(), RepoError>;
}
