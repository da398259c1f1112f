use std::{process::ExitCode, sync::Arc};

use escape_persistence_sea_orm::store::SeaOrmStore;
use escape_recommendation_http::{HttpRecommendationClient, RecommendationConfig};
use escape_server_app::{Application, build_application};
use log::{error, info};

mod logs;

const USAGE: &str = "usage: escape-server <reconcile-rooms | sync-rooms | sync-users | all>";

#[derive(Clone, Copy, Debug, PartialEq)]
enum Command {
    ReconcileRooms,
    SyncRooms,
    SyncUsers,
}

impl Command {
    fn parse(arg: &str) -> Option<Vec<Command>> {
        match arg {
            "reconcile-rooms" => Some(vec![Command::ReconcileRooms]),
            "sync-rooms" => Some(vec![Command::SyncRooms]),
            "sync-users" => Some(vec![Command::SyncUsers]),
            "all" => Some(vec![
                Command::ReconcileRooms,
                Command::SyncRooms,
                Command::SyncUsers,
            ]),
            _ => None,
        }
    }

    async fn run(self, app: &Application) -> Result<usize, String> {
        match self {
            Command::ReconcileRooms => app
                .room_reconcile_use_case
                .reconcile_all()
                .await
                .map_err(|e| e.to_string()),
            Command::SyncRooms => app
                .recommendation_sync_use_case
                .sync_rooms()
                .await
                .map_err(|e| e.to_string()),
            Command::SyncUsers => app
                .recommendation_sync_use_case
                .sync_users()
                .await
                .map_err(|e| e.to_string()),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    logs::init_logger();

    let Some(commands) = std::env::args().nth(1).as_deref().and_then(Command::parse) else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    let recommendation_config = match RecommendationConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid recommendation service configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let recommendation_client = match HttpRecommendationClient::new(recommendation_config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create recommendation client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let store = Arc::new(SeaOrmStore::new().await);

    let app = build_application(store, recommendation_client);

    for command in commands {
        info!("Running {:?}", command);
        match command.run(&app).await {
            Ok(count) => info!("{:?} finished, {} records affected", command, count),
            Err(e) => {
                error!("{:?} failed: {}", command, e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
