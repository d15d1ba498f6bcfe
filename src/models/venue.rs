use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Venue {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_city: String,
    pub venue_address: String,
    pub is_active: bool,
}
