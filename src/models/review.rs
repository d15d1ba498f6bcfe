use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub review_id: i32,
    pub event_id: i32,
    pub user_id: i32,
    pub author_name: String,
    pub rating: i16,
    pub review_text: String,
    pub created_at: NaiveDateTime,
}

impl Review {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }
}
