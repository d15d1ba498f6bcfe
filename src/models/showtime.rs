use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// One active event schedule with its seat aggregates, as returned by the
/// per-schedule availability query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduleSlot {
    pub event_schedule_id: i32,
    pub event_id: i32,
    pub event_name: String,
    pub event_type: String,
    pub event_genre: String,
    pub event_duration: i32,
    pub event_language: String,
    pub venue_id: i32,
    pub venue_name: String,
    pub slot_starts_at: NaiveDateTime,
    pub slot_ends_at: NaiveDateTime,
    pub min_price: f64,
    pub max_price: f64,
    pub total_seats: i64,
    pub available_seats: i64,
}

/// Seats of one schedule sharing a (ticket_type, ticket_price) key.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TicketSubtotal {
    pub ticket_type: String,
    pub ticket_price: f64,
    pub total_seats: i64,
    pub available_seats: i64,
}
