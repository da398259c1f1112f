use async_lock::OnceCell;
use escape_server_app::domain::{RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};

mod cache;
pub mod games;
pub mod reviews;
pub mod rooms;
pub mod store;
pub mod users;

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

pub async fn create_db_pool() -> DatabaseConnection {
    DB_POOL
        .get_or_init(|| async move {
            let mariadb_database =
                std::env::var("MARIADB_DATABASE").expect("MARIADB_DATABASE must be set");
            let mariadb_user = std::env::var("MARIADB_USER").expect("MARIADB_USER must be set");
            let mariadb_password =
                std::env::var("MARIADB_PASSWORD").expect("MARIADB_PASSWORD must be set");
            let mariadb_host = std::env::var("MARIADB_HOST").expect("MARIADB_HOST must be set");
            let mariadb_port = std::env::var("MARIADB_PORT").unwrap_or_else(|_| "3306".into());
            let db_url = format!(
                "mysql://{}:{}@{}:{}/{}",
                mariadb_user, mariadb_password, mariadb_host, mariadb_port, mariadb_database
            );

            let mut opt = ConnectOptions::new(&db_url);
            opt.max_connections(5).sqlx_logging_level(log::LevelFilter::Debug);

            Database::connect(opt)
                .await
                .expect("Failed to connect to database")
        })
        .await
        .clone()
}

pub(crate) fn repo_error(e: DbErr) -> RepoError {
    RepoError::StorageError(e.to_string())
}

pub(crate) fn retrieve_error(e: DbErr) -> RepoRetrieveError {
    RepoRetrieveError::StorageError(e.to_string())
}

pub(crate) fn create_error(e: DbErr) -> RepoCreateError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => RepoCreateError::Conflict,
        _ => RepoCreateError::StorageError(e.to_string()),
    }
}

pub(crate) fn update_error(e: DbErr) -> RepoUpdateError {
    match e {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => RepoUpdateError::NotFound,
        _ => RepoUpdateError::StorageError(e.to_string()),
    }
}
