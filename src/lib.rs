pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod routes;
pub mod services;
pub mod session;
pub mod store;
pub mod views;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::session::{RedisSessionStore, SessionStore};
use crate::store::{CatalogStore, PgCatalogStore, PgReviewStore, PgUserStore, ReviewStore, UserStore};

// Shared state handed to every handler
pub struct AppState {
    pub config: config::Config,
    pub catalog: Arc<dyn CatalogStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Connects Postgres and Redis, applies migrations and wires the stores.
    pub async fn connect(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::connect(&config.database).await?;
        db.run_migrations().await?;

        let redis = redis_client::RedisClient::connect(&config.redis.url).await?;
        let sessions = RedisSessionStore::new(redis, config.session.ttl_seconds);

        info!("Backends connected");
        Ok(Arc::new(Self {
            catalog: Arc::new(PgCatalogStore::new(db.clone())),
            reviews: Arc::new(PgReviewStore::new(db.clone())),
            users: Arc::new(PgUserStore::new(db)),
            sessions: Arc::new(sessions),
            config,
        }))
    }
}

/// Full application router with request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    controllers::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
