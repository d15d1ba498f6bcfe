use axum::{extract::State, response::Response, routing::post, Router};
use serde::Deserialize;
use std::sync::Arc;

use super::redirect;
use crate::error::AppResult;
use crate::middleware::{PageForm, Session};
use crate::routes::{return_target, Route};
use crate::services::reviews;
use crate::session::FlashMessage;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(Route::DeleteReview.path(), post(delete_review))
}

#[derive(Debug, Deserialize)]
pub struct DeleteReviewForm {
    pub review_id: i32,
    pub return_to: Option<String>,
}

// POST /reviews/delete
async fn delete_review(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    PageForm(form): PageForm<DeleteReviewForm>,
) -> AppResult<Response> {
    let target = return_target(form.return_to.as_deref(), Route::Home);

    let Some(user) = session.current_user(&state).await? else {
        session.flash(FlashMessage::error("Please log in to manage your reviews."));
        return redirect(&state, session, &Route::login_returning_to(&target)).await;
    };

    let outcome = reviews::delete_review(&*state.reviews, form.review_id, user.user_id).await?;
    session.flash(outcome.flash());
    redirect(&state, session, &target).await
}
