//! Data access seams.
//!
//! Handlers only see these traits through [`crate::AppState`]; production
//! wires the Postgres implementations from [`postgres`].

pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{Event, NewUser, Review, ScheduleSlot, TicketSubtotal, User, Venue};

pub use postgres::{PgCatalogStore, PgReviewStore, PgUserStore};

/// Which schedules an availability lookup covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowtimeScope {
    Venue(i32),
    Event(i32),
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn ping(&self) -> Result<(), sqlx::Error>;

    async fn active_events(&self) -> Result<Vec<Event>, sqlx::Error>;

    async fn active_venues(&self) -> Result<Vec<Venue>, sqlx::Error>;

    /// Returns the venue even when inactive; callers decide visibility.
    async fn find_venue(&self, venue_id: i32) -> Result<Option<Venue>, sqlx::Error>;

    async fn find_event(&self, event_id: i32) -> Result<Option<Event>, sqlx::Error>;

    /// Active schedules in `scope` starting on `date`, ordered by slot start,
    /// each with aggregated seat counts and price range.
    async fn schedule_slots(
        &self,
        scope: ShowtimeScope,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleSlot>, sqlx::Error>;

    async fn schedule_slot(&self, event_schedule_id: i32) -> Result<Option<ScheduleSlot>, sqlx::Error>;

    /// Per (type, price) subtotals for one schedule, cheapest first.
    async fn ticket_subtotals(&self, event_schedule_id: i32) -> Result<Vec<TicketSubtotal>, sqlx::Error>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn find_review(&self, review_id: i32) -> Result<Option<Review>, sqlx::Error>;

    async fn reviews_for_event(&self, event_id: i32) -> Result<Vec<Review>, sqlx::Error>;

    /// Deletes only when `user_id` owns the review. Returns whether a row went away.
    async fn delete_owned_review(&self, review_id: i32, user_id: i32) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, sqlx::Error>;

    /// `None` when the email is already registered.
    async fn create_user(&self, new_user: NewUser) -> Result<Option<User>, sqlx::Error>;

    async fn touch_last_login(&self, user_id: i32) -> Result<(), sqlx::Error>;
}
