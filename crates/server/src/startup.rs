use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::forms::{FormRepository, InMemoryFormRepository, SeaOrmFormRepository};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{routes, state::AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load `config.toml` (or `CONFIG_PATH`); fall back to env vars when the file is absent.
pub fn load_config() -> anyhow::Result<AppConfig> {
    match configs::load_default() {
        Ok(mut cfg) => {
            cfg.normalize_and_validate()?;
            Ok(cfg)
        }
        Err(e) => {
            info!(error = %e, "config file not loaded; using environment");
            let mut cfg = AppConfig::from_env();
            if cfg.database.url.trim().is_empty() {
                cfg.database.url = models::db::DATABASE_URL.clone();
            }
            Ok(cfg)
        }
    }
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Pick the form store: `FORMS_STORE=memory` keeps everything in-process, otherwise Postgres.
pub async fn build_repository(cfg: &AppConfig) -> anyhow::Result<Arc<dyn FormRepository>> {
    if std::env::var("FORMS_STORE").is_ok_and(|v| v.eq_ignore_ascii_case("memory")) {
        warn!("using in-memory form store; entries are lost on restart");
        return Ok(Arc::new(InMemoryFormRepository::new()));
    }
    cfg.database.validate()?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database migrations applied");
    Ok(Arc::new(SeaOrmFormRepository::new(db)))
}

/// Public entry: build the app and run the HTTP server until the process exits
pub async fn run() -> anyhow::Result<()> {
    run_with_shutdown(std::future::pending::<()>()).await
}

/// Build the app and serve until `shutdown` resolves, draining in-flight requests.
pub async fn run_with_shutdown<F>(shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;
    let repo = build_repository(&cfg).await?;
    let state = AppState::new(repo, cfg.forms);

    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting forms server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("forms server stopped");
    Ok(())
}
