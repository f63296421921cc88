use std::{future::Future, sync::Arc};

use axum::Router;
use common::utils::logging::{init_logging_default, init_logging_json};
use configs::{AppConfig, LogFormat, StorageBackend, StorageConfig};
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::employee::{
    repo::{InMemoryEmployeeRepository, JsonFileEmployeeRepository, SeaOrmEmployeeRepository},
    EmployeeRepository,
};

/// Initialize logging via shared common utils
pub fn init_logging(cfg: &AppConfig) {
    match cfg.logging.format {
        LogFormat::Json => init_logging_json(),
        LogFormat::Compact => init_logging_default(),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the employee store selected by `storage.backend`.
pub async fn open_repository(cfg: &StorageConfig) -> Result<Arc<dyn EmployeeRepository>, StartupError> {
    match cfg.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryEmployeeRepository::new())),
        StorageBackend::File => {
            let repo = JsonFileEmployeeRepository::open(&cfg.file_path)
                .await
                .map_err(|e| StartupError::Storage(e.to_string()))?;
            Ok(Arc::new(repo))
        }
        StorageBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database)
                .await
                .map_err(|e| StartupError::Storage(e.to_string()))?;
            if cfg.database.run_migrations {
                migration::Migrator::up(&db, None)
                    .await
                    .map_err(|e| StartupError::Storage(format!("migrations failed: {e}")))?;
                info!("employee migrations applied");
            }
            Ok(Arc::new(SeaOrmEmployeeRepository::new(db)))
        }
    }
}

/// Router with the default CORS policy applied.
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Resolves when the process receives Ctrl+C.
pub async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, draining connections");
    }
}

/// Open storage, bind, and serve until `shutdown` resolves.
pub async fn run_with_config<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let repo = open_repository(&cfg.storage).await?;
    info!(backend = ?cfg.storage.backend, "employee store opened");
    let app = build_app(ServerState::new(repo));

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "starting employee server");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("employee server stopped");
    Ok(())
}
