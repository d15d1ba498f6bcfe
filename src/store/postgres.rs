use async_trait::async_trait;
use chrono::NaiveDate;

use super::{CatalogStore, ReviewStore, ShowtimeScope, UserStore};
use crate::database::Database;
use crate::models::{Event, NewUser, Review, ScheduleSlot, TicketSubtotal, User, Venue};

const SLOT_SELECT: &str = r#"
    SELECT
        es.event_schedule_id,
        e.event_id,
        e.event_name,
        e.event_type,
        e.event_genre,
        e.event_duration,
        e.event_language,
        v.venue_id,
        v.venue_name,
        vs.slot_starts_at,
        vs.slot_ends_at,
        MIN(t.ticket_price)::float8 AS min_price,
        MAX(t.ticket_price)::float8 AS max_price,
        COUNT(DISTINCT t.ticket_id) AS total_seats,
        COUNT(DISTINCT t.ticket_id) FILTER (WHERE t.is_vacant) AS available_seats
    FROM events e
    JOIN event_schedules es ON es.event_id = e.event_id AND es.is_active
    JOIN venue_schedules vs ON vs.venue_schedule_id = es.venue_schedule_id
    JOIN venues v ON v.venue_id = vs.venue_id
    JOIN tickets t ON t.event_schedule_id = es.event_schedule_id AND t.is_active
    WHERE e.is_active AND v.is_active
"#;

const SLOT_GROUP_ORDER: &str = r#"
    GROUP BY es.event_schedule_id, e.event_id, v.venue_id, vs.venue_schedule_id
    ORDER BY vs.slot_starts_at, es.event_schedule_id
"#;

const ON_DATE: &str = "vs.slot_starts_at >= $2::date AND vs.slot_starts_at < $2::date + 1";

fn slot_query(filter: &str) -> String {
    format!("{SLOT_SELECT} AND {filter} {SLOT_GROUP_ORDER}")
}

const REVIEW_SELECT: &str = r#"
    SELECT
        r.review_id,
        r.event_id,
        r.user_id,
        u.first_name || ' ' || u.surname AS author_name,
        r.rating,
        r.review_text,
        r.created_at
    FROM reviews r
    JOIN users u ON u.user_id = r.user_id
"#;

const USER_COLUMNS: &str = "user_id, email, password_hash, first_name, surname, \
                            is_admin, is_active, registered_at, last_logged_in";

#[derive(Clone)]
pub struct PgCatalogStore {
    db: Database,
}

impl PgCatalogStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.db.ping().await
    }

    async fn active_events(&self) -> Result<Vec<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            "SELECT event_id, event_name, event_type, event_genre, event_duration, event_language, is_active
             FROM events
             WHERE is_active
             ORDER BY event_name",
        )
        .fetch_all(&self.db.pool)
        .await
    }

    async fn active_venues(&self) -> Result<Vec<Venue>, sqlx::Error> {
        sqlx::query_as::<_, Venue>(
            "SELECT venue_id, venue_name, venue_city, venue_address, is_active
             FROM venues
             WHERE is_active
             ORDER BY venue_city, venue_name",
        )
        .fetch_all(&self.db.pool)
        .await
    }

    async fn find_venue(&self, venue_id: i32) -> Result<Option<Venue>, sqlx::Error> {
        sqlx::query_as::<_, Venue>(
            "SELECT venue_id, venue_name, venue_city, venue_address, is_active
             FROM venues
             WHERE venue_id = $1",
        )
        .bind(venue_id)
        .fetch_optional(&self.db.pool)
        .await
    }

    async fn find_event(&self, event_id: i32) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            "SELECT event_id, event_name, event_type, event_genre, event_duration, event_language, is_active
             FROM events
             WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.db.pool)
        .await
    }

    async fn schedule_slots(
        &self,
        scope: ShowtimeScope,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleSlot>, sqlx::Error> {
        let (filter, id) = match scope {
            ShowtimeScope::Venue(venue_id) => (format!("vs.venue_id = $1 AND {ON_DATE}"), venue_id),
            ShowtimeScope::Event(event_id) => (format!("e.event_id = $1 AND {ON_DATE}"), event_id),
        };

        sqlx::query_as::<_, ScheduleSlot>(&slot_query(&filter))
            .bind(id)
            .bind(date)
            .fetch_all(&self.db.pool)
            .await
    }

    async fn schedule_slot(&self, event_schedule_id: i32) -> Result<Option<ScheduleSlot>, sqlx::Error> {
        sqlx::query_as::<_, ScheduleSlot>(&slot_query("es.event_schedule_id = $1"))
            .bind(event_schedule_id)
            .fetch_optional(&self.db.pool)
            .await
    }

    async fn ticket_subtotals(&self, event_schedule_id: i32) -> Result<Vec<TicketSubtotal>, sqlx::Error> {
        sqlx::query_as::<_, TicketSubtotal>(
            r#"
            SELECT
                ticket_type,
                ticket_price::float8 AS ticket_price,
                COUNT(*) AS total_seats,
                COUNT(*) FILTER (WHERE is_vacant) AS available_seats
            FROM tickets
            WHERE event_schedule_id = $1 AND is_active
            GROUP BY ticket_type, ticket_price
            ORDER BY ticket_price ASC, ticket_type
            "#,
        )
        .bind(event_schedule_id)
        .fetch_all(&self.db.pool)
        .await
    }
}

#[derive(Clone)]
pub struct PgReviewStore {
    db: Database,
}

impl PgReviewStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn find_review(&self, review_id: i32) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!("{REVIEW_SELECT} WHERE r.review_id = $1"))
            .bind(review_id)
            .fetch_optional(&self.db.pool)
            .await
    }

    async fn reviews_for_event(&self, event_id: i32) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "{REVIEW_SELECT} WHERE r.event_id = $1 ORDER BY r.created_at DESC, r.review_id DESC"
        ))
        .bind(event_id)
        .fetch_all(&self.db.pool)
        .await
    }

    async fn delete_owned_review(&self, review_id: i32, user_id: i32) -> Result<bool, sqlx::Error> {
        sqlx::query("DELETE FROM reviews WHERE review_id = $1 AND user_id = $2")
            .bind(review_id)
            .bind(user_id)
            .execute(&self.db.pool)
            .await
            .map(|r| r.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    db: Database,
}

impl PgUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.db.pool)
        .await
    }

    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.db.pool)
            .await
    }

    async fn create_user(&self, new_user: NewUser) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, first_name, surname)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (email) DO NOTHING
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.first_name)
        .bind(new_user.surname)
        .fetch_optional(&self.db.pool)
        .await
    }

    async fn touch_last_login(&self, user_id: i32) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_logged_in = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db.pool)
            .await
            .map(|_| ())
    }
}
