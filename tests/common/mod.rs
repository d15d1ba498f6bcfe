#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use catchify::config::{
    AppConfig, AuthConfig, Config, DatabaseConfig, LogFormat, RedisConfig, SessionConfig,
};
use catchify::models::{Event, NewUser, Review, ScheduleSlot, TicketSubtotal, User, Venue};
use catchify::session::{SessionData, SessionError, SessionStore};
use catchify::store::{CatalogStore, ReviewStore, ShowtimeScope, UserStore};
use catchify::{app, AppState};

pub const COOKIE: &str = "catchify_session";

pub fn test_config() -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            environment: "test".into(),
            rust_log: "catchify=debug".into(),
            log_format: LogFormat::Text,
        },
        database: DatabaseConfig {
            url: "postgres://unused".into(),
            pool_size: 1,
        },
        redis: RedisConfig {
            url: "redis://unused".into(),
        },
        session: SessionConfig {
            cookie_name: COOKIE.into(),
            ttl_seconds: 3600,
            secure_cookie: false,
        },
        auth: AuthConfig { bcrypt_cost: 4 },
    }
}

pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap()
}

/* ---------- catalog ---------- */

#[derive(Debug, Clone)]
pub struct FakeSchedule {
    pub event_schedule_id: i32,
    pub event_id: i32,
    pub venue_id: i32,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct FakeTicket {
    pub event_schedule_id: i32,
    pub ticket_type: String,
    pub ticket_price: f64,
    pub is_vacant: bool,
    pub is_active: bool,
}

/// Mirrors the Postgres aggregation over plain vectors.
#[derive(Default)]
pub struct FakeCatalog {
    pub venues: Mutex<Vec<Venue>>,
    pub events: Mutex<Vec<Event>>,
    pub schedules: Mutex<Vec<FakeSchedule>>,
    pub tickets: Mutex<Vec<FakeTicket>>,
    pub failing: AtomicBool,
}

impl FakeCatalog {
    pub fn add_venue(&self, venue_id: i32, name: &str, active: bool) {
        self.venues.lock().unwrap().push(Venue {
            venue_id,
            venue_name: name.into(),
            venue_city: "Mumbai".into(),
            venue_address: "1 Main Road".into(),
            is_active: active,
        });
    }

    pub fn add_event(&self, event_id: i32, name: &str, active: bool) {
        self.events.lock().unwrap().push(Event {
            event_id,
            event_name: name.into(),
            event_type: "Movie".into(),
            event_genre: "Drama".into(),
            event_duration: 120,
            event_language: "English".into(),
            is_active: active,
        });
    }

    pub fn add_schedule(&self, event_schedule_id: i32, event_id: i32, venue_id: i32, starts_at: NaiveDateTime) {
        self.schedules.lock().unwrap().push(FakeSchedule {
            event_schedule_id,
            event_id,
            venue_id,
            starts_at,
            ends_at: starts_at + chrono::Duration::minutes(120),
            is_active: true,
        });
    }

    /// Adds `total` seats of one type, the first `vacant` of them free.
    pub fn add_tickets(&self, event_schedule_id: i32, ticket_type: &str, price: f64, total: usize, vacant: usize) {
        let mut tickets = self.tickets.lock().unwrap();
        for i in 0..total {
            tickets.push(FakeTicket {
                event_schedule_id,
                ticket_type: ticket_type.into(),
                ticket_price: price,
                is_vacant: i < vacant,
                is_active: true,
            });
        }
    }

    pub fn fail_queries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.failing.load(Ordering::SeqCst) {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }

    fn aggregate(&self, schedule: &FakeSchedule) -> Option<ScheduleSlot> {
        let events = self.events.lock().unwrap();
        let venues = self.venues.lock().unwrap();
        let event = events.iter().find(|e| e.event_id == schedule.event_id && e.is_active)?;
        let venue = venues.iter().find(|v| v.venue_id == schedule.venue_id && v.is_active)?;
        if !schedule.is_active {
            return None;
        }

        let tickets = self.tickets.lock().unwrap();
        let rows: Vec<&FakeTicket> = tickets
            .iter()
            .filter(|t| t.event_schedule_id == schedule.event_schedule_id && t.is_active)
            .collect();
        if rows.is_empty() {
            return None;
        }

        Some(ScheduleSlot {
            event_schedule_id: schedule.event_schedule_id,
            event_id: event.event_id,
            event_name: event.event_name.clone(),
            event_type: event.event_type.clone(),
            event_genre: event.event_genre.clone(),
            event_duration: event.event_duration,
            event_language: event.event_language.clone(),
            venue_id: venue.venue_id,
            venue_name: venue.venue_name.clone(),
            slot_starts_at: schedule.starts_at,
            slot_ends_at: schedule.ends_at,
            min_price: rows.iter().map(|t| t.ticket_price).fold(f64::INFINITY, f64::min),
            max_price: rows.iter().map(|t| t.ticket_price).fold(f64::NEG_INFINITY, f64::max),
            total_seats: rows.len() as i64,
            available_seats: rows.iter().filter(|t| t.is_vacant).count() as i64,
        })
    }
}

#[async_trait]
impl CatalogStore for FakeCatalog {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.check()
    }

    async fn active_events(&self) -> Result<Vec<Event>, sqlx::Error> {
        self.check()?;
        Ok(self.events.lock().unwrap().iter().filter(|e| e.is_active).cloned().collect())
    }

    async fn active_venues(&self) -> Result<Vec<Venue>, sqlx::Error> {
        self.check()?;
        Ok(self.venues.lock().unwrap().iter().filter(|v| v.is_active).cloned().collect())
    }

    async fn find_venue(&self, venue_id: i32) -> Result<Option<Venue>, sqlx::Error> {
        self.check()?;
        Ok(self.venues.lock().unwrap().iter().find(|v| v.venue_id == venue_id).cloned())
    }

    async fn find_event(&self, event_id: i32) -> Result<Option<Event>, sqlx::Error> {
        self.check()?;
        Ok(self.events.lock().unwrap().iter().find(|e| e.event_id == event_id).cloned())
    }

    async fn schedule_slots(
        &self,
        scope: ShowtimeScope,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleSlot>, sqlx::Error> {
        self.check()?;
        let schedules = self.schedules.lock().unwrap().clone();
        let mut slots: Vec<ScheduleSlot> = schedules
            .iter()
            .filter(|s| s.starts_at.date() == date)
            .filter(|s| match scope {
                ShowtimeScope::Venue(id) => s.venue_id == id,
                ShowtimeScope::Event(id) => s.event_id == id,
            })
            .filter_map(|s| self.aggregate(s))
            .collect();
        slots.sort_by_key(|s| (s.slot_starts_at, s.event_schedule_id));
        Ok(slots)
    }

    async fn schedule_slot(&self, event_schedule_id: i32) -> Result<Option<ScheduleSlot>, sqlx::Error> {
        self.check()?;
        let schedules = self.schedules.lock().unwrap().clone();
        Ok(schedules
            .iter()
            .find(|s| s.event_schedule_id == event_schedule_id)
            .and_then(|s| self.aggregate(s)))
    }

    async fn ticket_subtotals(&self, event_schedule_id: i32) -> Result<Vec<TicketSubtotal>, sqlx::Error> {
        self.check()?;
        let tickets = self.tickets.lock().unwrap();
        let mut subtotals: Vec<TicketSubtotal> = Vec::new();
        for t in tickets
            .iter()
            .filter(|t| t.event_schedule_id == event_schedule_id && t.is_active)
        {
            let existing = subtotals
                .iter_mut()
                .find(|s| s.ticket_type == t.ticket_type && s.ticket_price == t.ticket_price);
            match existing {
                Some(s) => {
                    s.total_seats += 1;
                    s.available_seats += i64::from(t.is_vacant);
                }
                None => subtotals.push(TicketSubtotal {
                    ticket_type: t.ticket_type.clone(),
                    ticket_price: t.ticket_price,
                    total_seats: 1,
                    available_seats: i64::from(t.is_vacant),
                }),
            }
        }
        subtotals.sort_by(|a, b| {
            a.ticket_price
                .total_cmp(&b.ticket_price)
                .then_with(|| a.ticket_type.cmp(&b.ticket_type))
        });
        Ok(subtotals)
    }
}

/* ---------- reviews ---------- */

#[derive(Default)]
pub struct FakeReviews {
    pub rows: Mutex<Vec<Review>>,
}

impl FakeReviews {
    pub fn add(&self, review_id: i32, event_id: i32, user_id: i32, text: &str) {
        self.rows.lock().unwrap().push(Review {
            review_id,
            event_id,
            user_id,
            author_name: format!("User {user_id}"),
            rating: 4,
            review_text: text.into(),
            created_at: at(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 12, 0),
        });
    }

    pub fn exists(&self, review_id: i32) -> bool {
        self.rows.lock().unwrap().iter().any(|r| r.review_id == review_id)
    }
}

#[async_trait]
impl ReviewStore for FakeReviews {
    async fn find_review(&self, review_id: i32) -> Result<Option<Review>, sqlx::Error> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.review_id == review_id).cloned())
    }

    async fn reviews_for_event(&self, event_id: i32) -> Result<Vec<Review>, sqlx::Error> {
        Ok(self.rows.lock().unwrap().iter().filter(|r| r.event_id == event_id).cloned().collect())
    }

    async fn delete_owned_review(&self, review_id: i32, user_id: i32) -> Result<bool, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.review_id == review_id && r.user_id == user_id));
        Ok(rows.len() < before)
    }
}

/* ---------- users ---------- */

#[derive(Default)]
pub struct FakeUsers {
    pub rows: Mutex<Vec<User>>,
}

impl FakeUsers {
    pub fn add(&self, user_id: i32, email: &str, password: &str, is_admin: bool) {
        self.rows.lock().unwrap().push(User {
            user_id,
            email: email.into(),
            password_hash: bcrypt::hash(password, 4).unwrap(),
            first_name: format!("First{user_id}"),
            surname: "Tester".into(),
            is_admin,
            is_active: true,
            registered_at: at(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 9, 0),
            last_logged_in: None,
        });
    }

    pub fn get(&self, user_id: i32) -> Option<User> {
        self.rows.lock().unwrap().iter().find(|u| u.user_id == user_id).cloned()
    }
}

#[async_trait]
impl UserStore for FakeUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, sqlx::Error> {
        Ok(self.get(user_id))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<Option<User>, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email.eq_ignore_ascii_case(&new_user.email)) {
            return Ok(None);
        }
        let user = User {
            user_id: rows.iter().map(|u| u.user_id).max().unwrap_or(0) + 1,
            email: new_user.email,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            surname: new_user.surname,
            is_admin: false,
            is_active: true,
            registered_at: at(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 9, 0),
            last_logged_in: None,
        };
        rows.push(user.clone());
        Ok(Some(user))
    }

    async fn touch_last_login(&self, user_id: i32) -> Result<(), sqlx::Error> {
        if let Some(user) = self.rows.lock().unwrap().iter_mut().find(|u| u.user_id == user_id) {
            user.last_logged_in = Some(at(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(), 10, 0));
        }
        Ok(())
    }
}

/* ---------- sessions ---------- */

#[derive(Default)]
pub struct FakeSessions {
    pub data: Mutex<HashMap<String, SessionData>>,
}

impl FakeSessions {
    pub fn logged_in(&self, token: &str, user_id: i32) {
        self.data.lock().unwrap().insert(
            token.into(),
            SessionData { user_id: Some(user_id), flash: Vec::new() },
        );
    }

    pub fn get(&self, token: &str) -> Option<SessionData> {
        self.data.lock().unwrap().get(token).cloned()
    }
}

#[async_trait]
impl SessionStore for FakeSessions {
    async fn load(&self, token: &str) -> Result<Option<SessionData>, SessionError> {
        Ok(self.get(token))
    }

    async fn save(&self, token: &str, data: &SessionData) -> Result<(), SessionError> {
        self.data.lock().unwrap().insert(token.into(), data.clone());
        Ok(())
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        self.data.lock().unwrap().remove(token);
        Ok(())
    }
}

/* ---------- harness ---------- */

pub struct TestApp {
    pub state: Arc<AppState>,
    pub catalog: Arc<FakeCatalog>,
    pub reviews: Arc<FakeReviews>,
    pub users: Arc<FakeUsers>,
    pub sessions: Arc<FakeSessions>,
}

impl TestApp {
    pub fn new() -> Self {
        let catalog = Arc::new(FakeCatalog::default());
        let reviews = Arc::new(FakeReviews::default());
        let users = Arc::new(FakeUsers::default());
        let sessions = Arc::new(FakeSessions::default());

        let state = Arc::new(AppState {
            config: test_config(),
            catalog: catalog.clone(),
            reviews: reviews.clone(),
            users: users.clone(),
            sessions: sessions.clone(),
        });

        TestApp { state, catalog, reviews, users, sessions }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        app(self.state.clone()).oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("{COOKIE}={token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, form: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("{COOKIE}={token}"));
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap()).await
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Value of the session cookie set by a response, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| {
            let pair = raw.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            (name == COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}
