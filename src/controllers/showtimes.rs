use axum::{
    extract::State,
    response::{Html, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::page;
use crate::error::{AppResult, FragmentResult};
use crate::middleware::{FragmentQuery, PageQuery, Session};
use crate::routes::Route;
use crate::services::{dates, showtimes};
use crate::{views, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(Route::EventShowtimes.path(), get(event_page))
        .route(Route::EventShowtimesFragment.path(), get(event_fragment))
        .route(Route::VenueShowtimes.path(), get(venue_page))
        .route(Route::VenueShowtimesFragment.path(), get(venue_fragment))
}

#[derive(Debug, Deserialize)]
pub struct EventQuery {
    pub event_id: i32,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VenueQuery {
    pub venue_id: i32,
    pub date: Option<String>,
}

// GET /showtimes?event_id=&date=
async fn event_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    PageQuery(params): PageQuery<EventQuery>,
) -> AppResult<Response> {
    let event = showtimes::find_active_event(&*state.catalog, params.event_id).await?;
    let today = dates::today();
    let selected = dates::parse_date_or(params.date.as_deref(), today);
    let strip = dates::date_strip(today, selected);
    let reviews = state.reviews.reviews_for_event(event.event_id).await?;
    let user = session.current_user(&state).await?;

    let body = views::showtimes::event_page(
        &event,
        &strip,
        selected,
        &reviews,
        user.as_ref().map(|u| u.user_id),
    );
    page(&state, session, &event.event_name, user.as_ref(), body).await
}

// GET /fragments/event-showtimes?event_id=&date=
async fn event_fragment(
    State(state): State<Arc<AppState>>,
    FragmentQuery(params): FragmentQuery<EventQuery>,
) -> FragmentResult<Html<String>> {
    let date = dates::parse_date_or(params.date.as_deref(), dates::today());
    let day = showtimes::event_showtimes(&*state.catalog, params.event_id, date).await?;
    Ok(Html(views::showtimes::event_fragment(&day)))
}

// GET /venues/showtimes?venue_id=&date=
async fn venue_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    PageQuery(params): PageQuery<VenueQuery>,
) -> AppResult<Response> {
    let venue = showtimes::find_active_venue(&*state.catalog, params.venue_id).await?;
    let today = dates::today();
    let selected = dates::parse_date_or(params.date.as_deref(), today);
    let strip = dates::date_strip(today, selected);
    let user = session.current_user(&state).await?;

    let body = views::showtimes::venue_page(&venue, &strip, selected);
    page(&state, session, &venue.venue_name, user.as_ref(), body).await
}

// GET /fragments/venue-showtimes?venue_id=&date=
async fn venue_fragment(
    State(state): State<Arc<AppState>>,
    FragmentQuery(params): FragmentQuery<VenueQuery>,
) -> FragmentResult<Html<String>> {
    let date = dates::parse_date_or(params.date.as_deref(), dates::today());
    let day = showtimes::venue_showtimes(&*state.catalog, params.venue_id, date).await?;
    Ok(Html(views::showtimes::venue_fragment(&day)))
}
