use axum::{extract::State, response::Response, routing::get, Router};
use std::sync::Arc;

use super::{page, redirect};
use crate::error::AppResult;
use crate::middleware::Session;
use crate::routes::Route;
use crate::session::FlashMessage;
use crate::{views, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(Route::AdminDashboard.path(), get(dashboard))
}

// GET /admin
async fn dashboard(State(state): State<Arc<AppState>>, mut session: Session) -> AppResult<Response> {
    match session.current_user(&state).await? {
        None => {
            let login = Route::login_returning_to(Route::AdminDashboard.path());
            redirect(&state, session, &login).await
        }
        Some(user) if !user.is_admin => {
            tracing::warn!(user_id = user.user_id, "non-admin tried to open the dashboard");
            session.flash(FlashMessage::error("The dashboard is only available to administrators."));
            redirect(&state, session, Route::Home.path()).await
        }
        Some(user) => {
            let body = views::pages::admin_dashboard(&user.display_name());
            page(&state, session, "Dashboard", Some(&user), body).await
        }
    }
}
