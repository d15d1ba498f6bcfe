use axum::{
    extract::State,
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{page, redirect};
use crate::error::AppResult;
use crate::middleware::{PageQuery, Session};
use crate::routes::Route;
use crate::services::showtimes;
use crate::session::FlashMessage;
use crate::{views, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(Route::Booking.path(), get(booking_page))
}

#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    pub event_schedule_id: i32,
}

// GET /booking?event_schedule_id=
async fn booking_page(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    PageQuery(params): PageQuery<BookingQuery>,
) -> AppResult<Response> {
    let Some(user) = session.current_user(&state).await? else {
        let here = Route::Booking.url(&[("event_schedule_id", params.event_schedule_id)]);
        session.flash(FlashMessage::info("Please log in to book tickets."));
        return redirect(&state, session, &Route::login_returning_to(&here)).await;
    };

    let showtime = showtimes::showtime(&*state.catalog, params.event_schedule_id).await?;
    let body = views::showtimes::booking_page(&showtime);
    page(&state, session, "Book tickets", Some(&user), body).await
}
