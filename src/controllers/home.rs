use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use super::page;
use crate::error::AppResult;
use crate::middleware::Session;
use crate::routes::Route;
use crate::{views, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(Route::Home.path(), get(home))
        .route(Route::Health.path(), get(health))
}

async fn home(State(state): State<Arc<AppState>>, session: Session) -> AppResult<Response> {
    let user = session.current_user(&state).await?;
    let events = state.catalog.active_events().await?;
    let venues = state.catalog.active_venues().await?;

    let body = views::pages::home(&events, &venues);
    page(&state, session, "Now showing", user.as_ref(), body).await
}

// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.catalog.ping().await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            tracing::error!("health check failed: {:?}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable").into_response()
        }
    }
}
