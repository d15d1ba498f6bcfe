pub mod admin;
pub mod auth;
pub mod booking;
pub mod home;
pub mod reviews;
pub mod showtimes;

use axum::{
    response::{Html, IntoResponse, Redirect, Response},
    Router,
};
use std::sync::Arc;

use crate::error::AppResult;
use crate::middleware::Session;
use crate::models::User;
use crate::{views, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(home::routes())
        .merge(auth::routes())
        .merge(showtimes::routes())
        .merge(reviews::routes())
        .merge(booking::routes())
        .merge(admin::routes())
}

/* ---------- helpers ---------- */

/// Wraps `body` in the site layout, draining pending flash messages.
async fn page(
    state: &AppState,
    mut session: Session,
    title: &str,
    user: Option<&User>,
    body: String,
) -> AppResult<Response> {
    let flash = session.take_flash();
    let jar = session.finish(state).await?;
    Ok((jar, Html(views::layout(title, user, &flash, &body))).into_response())
}

/// 303 to `target`, persisting whatever the handler put in the session.
async fn redirect(state: &AppState, session: Session, target: &str) -> AppResult<Response> {
    let jar = session.finish(state).await?;
    Ok((jar, Redirect::to(target)).into_response())
}
