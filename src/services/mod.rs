pub mod auth;
pub mod dates;
pub mod reviews;
pub mod showtimes;
