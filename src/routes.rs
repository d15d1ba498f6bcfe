//! Every path the application serves or redirects to.
//!
//! Handlers never spell out a path literal; the router mounts
//! [`Route::path`] and links are built through [`Route::url`] so a
//! rename only happens here.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Health,
    Login,
    Register,
    Logout,
    AdminDashboard,
    EventShowtimes,
    EventShowtimesFragment,
    VenueShowtimes,
    VenueShowtimesFragment,
    DeleteReview,
    Booking,
}

impl Route {
    pub const ALL: [Route; 12] = [
        Route::Home,
        Route::Health,
        Route::Login,
        Route::Register,
        Route::Logout,
        Route::AdminDashboard,
        Route::EventShowtimes,
        Route::EventShowtimesFragment,
        Route::VenueShowtimes,
        Route::VenueShowtimesFragment,
        Route::DeleteReview,
        Route::Booking,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Health => "/health",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Logout => "/logout",
            Route::AdminDashboard => "/admin",
            Route::EventShowtimes => "/showtimes",
            Route::EventShowtimesFragment => "/fragments/event-showtimes",
            Route::VenueShowtimes => "/venues/showtimes",
            Route::VenueShowtimesFragment => "/fragments/venue-showtimes",
            Route::DeleteReview => "/reviews/delete",
            Route::Booking => "/booking",
        }
    }

    /// Path plus an urlencoded query string. Falls back to the bare path
    /// if the query cannot be encoded (only maps and structs can).
    pub fn url<Q: Serialize + ?Sized>(self, query: &Q) -> String {
        match serde_urlencoded::to_string(query) {
            Ok(qs) if !qs.is_empty() => format!("{}?{}", self.path(), qs),
            Ok(_) => self.path().to_string(),
            Err(e) => {
                tracing::warn!("could not encode query for {}: {}", self.path(), e);
                self.path().to_string()
            }
        }
    }

    /// Login page that sends the user back to `return_to` afterwards.
    pub fn login_returning_to(return_to: &str) -> String {
        Route::Login.url(&[("return_to", return_to)])
    }
}

/// Accepts only same-site absolute paths as redirect targets.
pub fn safe_return_to(candidate: Option<&str>) -> Option<String> {
    let candidate = candidate?.trim();
    let local = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.contains('\\')
        && !candidate.contains("://")
        && !candidate.chars().any(char::is_control);

    local.then(|| candidate.to_string())
}

/// `return_to` if it is safe, otherwise `fallback`.
pub fn return_target(candidate: Option<&str>, fallback: Route) -> String {
    safe_return_to(candidate).unwrap_or_else(|| fallback.path().to_string())
}
