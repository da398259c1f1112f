use escape_persistence_sea_orm::create_db_pool;
use escape_persistence_sea_orm_entities::{game, review, room, user};
use sea_orm::{ConnectionTrait, DatabaseBackend, Schema, sea_query::Index};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let pool = create_db_pool().await;

    let schema = Schema::new(DatabaseBackend::MySql);
    let room_table = schema.create_table_from_entity(room::Entity);
    let user_table = schema.create_table_from_entity(user::Entity);
    let game_table = schema.create_table_from_entity(game::Entity);
    let review_table = schema.create_table_from_entity(review::Entity);

    pool.execute(&room_table)
        .await
        .expect("Failed to create rooms table");
    pool.execute(&user_table)
        .await
        .expect("Failed to create users table");
    pool.execute(&game_table)
        .await
        .expect("Failed to create games table");
    pool.execute(&review_table)
        .await
        .expect("Failed to create reviews table");

    let one_game_per_room = Index::create()
        .name("idx_games_user_room")
        .table(game::Entity)
        .col(game::Column::UserId)
        .col(game::Column::RoomId)
        .unique()
        .to_owned();
    let reviews_by_room = Index::create()
        .name("idx_reviews_room")
        .table(review::Entity)
        .col(review::Column::RoomId)
        .to_owned();

    pool.execute(&one_game_per_room)
        .await
        .expect("Failed to create games index");
    pool.execute(&reviews_by_room)
        .await
        .expect("Failed to create reviews index");

    println!("Created database tables successfully");
}
