//! Showtime availability for a venue or an event on one day.
//!
//! The store returns one aggregated row per active schedule. This module
//! attaches the ticket-type subtotals, classifies availability and groups
//! the schedules by event (venue view) or by venue (event view), keeping
//! the order in which each group was first seen.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Event, ScheduleSlot, TicketSubtotal, Venue};
use crate::store::{CatalogStore, ShowtimeScope};

/// Slots with fewer vacant seats than this (but at least one) are "few left".
pub const FEW_LEFT_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    SoldOut,
    FewLeft,
    Available,
}

impl Availability {
    pub fn classify(available_seats: i64) -> Self {
        if available_seats <= 0 {
            Availability::SoldOut
        } else if available_seats < FEW_LEFT_THRESHOLD {
            Availability::FewLeft
        } else {
            Availability::Available
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Availability::SoldOut => "sold-out",
            Availability::FewLeft => "few-left",
            Availability::Available => "available",
        }
    }

    pub fn is_bookable(self) -> bool {
        self != Availability::SoldOut
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Showtime {
    pub slot: ScheduleSlot,
    pub status: Availability,
    pub tickets: Vec<TicketSubtotal>,
}

impl Showtime {
    pub fn new(mut slot: ScheduleSlot, tickets: Vec<TicketSubtotal>) -> Self {
        if slot.available_seats > slot.total_seats {
            warn!(
                event_schedule_id = slot.event_schedule_id,
                available = slot.available_seats,
                total = slot.total_seats,
                "vacant seats exceed total, clamping"
            );
            slot.available_seats = slot.total_seats;
        }

        let subtotal_seats: i64 = tickets.iter().map(|t| t.total_seats).sum();
        if !tickets.is_empty() && subtotal_seats != slot.total_seats {
            warn!(
                event_schedule_id = slot.event_schedule_id,
                subtotal_seats,
                total = slot.total_seats,
                "ticket subtotals disagree with schedule total"
            );
        }

        Showtime {
            status: Availability::classify(slot.available_seats),
            slot,
            tickets,
        }
    }

    /// "available/total", e.g. "3/10".
    pub fn seats_label(&self) -> String {
        format!("{}/{}", self.slot.available_seats, self.slot.total_seats)
    }

    pub fn price_label(&self) -> String {
        if (self.slot.max_price - self.slot.min_price).abs() < 0.005 {
            format!("{:.2}", self.slot.min_price)
        } else {
            format!("{:.2} - {:.2}", self.slot.min_price, self.slot.max_price)
        }
    }

    pub fn time_label(&self) -> String {
        format!(
            "{} - {}",
            self.slot.slot_starts_at.format("%H:%M"),
            self.slot.slot_ends_at.format("%H:%M")
        )
    }
}

/// All showtimes of one event on the requested day.
#[derive(Debug, Clone, Serialize)]
pub struct EventShowtimes {
    pub event_id: i32,
    pub event_name: String,
    pub event_type: String,
    pub event_genre: String,
    pub event_duration: i32,
    pub event_language: String,
    pub showtimes: Vec<Showtime>,
}

/// All showtimes at one venue on the requested day.
#[derive(Debug, Clone, Serialize)]
pub struct VenueShowtimes {
    pub venue_id: i32,
    pub venue_name: String,
    pub showtimes: Vec<Showtime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueDay {
    pub venue: Venue,
    pub date: NaiveDate,
    pub events: Vec<EventShowtimes>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDay {
    pub event: Event,
    pub date: NaiveDate,
    pub venues: Vec<VenueShowtimes>,
}

fn group_first_seen<K, F>(showtimes: Vec<Showtime>, key: F) -> Vec<Vec<Showtime>>
where
    K: Eq + Hash,
    F: Fn(&Showtime) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<Showtime>> = Vec::new();

    for showtime in showtimes {
        let slot = *index.entry(key(&showtime)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(showtime);
    }

    groups
}

pub fn group_by_event(showtimes: Vec<Showtime>) -> Vec<EventShowtimes> {
    group_first_seen(showtimes, |s| s.slot.event_id)
        .into_iter()
        .filter_map(|group| {
            let head = group.first()?.slot.clone();
            Some(EventShowtimes {
                event_id: head.event_id,
                event_name: head.event_name,
                event_type: head.event_type,
                event_genre: head.event_genre,
                event_duration: head.event_duration,
                event_language: head.event_language,
                showtimes: group,
            })
        })
        .collect()
}

pub fn group_by_venue(showtimes: Vec<Showtime>) -> Vec<VenueShowtimes> {
    group_first_seen(showtimes, |s| s.slot.venue_id)
        .into_iter()
        .filter_map(|group| {
            let head = group.first()?;
            Some(VenueShowtimes {
                venue_id: head.slot.venue_id,
                venue_name: head.slot.venue_name.clone(),
                showtimes: group,
            })
        })
        .collect()
}

fn require_positive(value: i32, name: &str) -> AppResult<i32> {
    if value <= 0 {
        return Err(AppError::BadRequest(format!("{name} must be > 0")));
    }
    Ok(value)
}

async fn attach_tickets(
    catalog: &dyn CatalogStore,
    slots: Vec<ScheduleSlot>,
) -> AppResult<Vec<Showtime>> {
    let mut showtimes = Vec::with_capacity(slots.len());
    for slot in slots {
        let tickets = catalog.ticket_subtotals(slot.event_schedule_id).await?;
        showtimes.push(Showtime::new(slot, tickets));
    }
    Ok(showtimes)
}

/// Showtimes at an active venue on `date`, grouped by event.
pub async fn venue_showtimes(
    catalog: &dyn CatalogStore,
    venue_id: i32,
    date: NaiveDate,
) -> AppResult<VenueDay> {
    let venue = find_active_venue(catalog, venue_id).await?;

    let slots = catalog.schedule_slots(ShowtimeScope::Venue(venue_id), date).await?;
    debug!(venue_id, %date, schedules = slots.len(), "venue showtimes loaded");

    let showtimes = attach_tickets(catalog, slots).await?;
    Ok(VenueDay {
        venue,
        date,
        events: group_by_event(showtimes),
    })
}

/// Showtimes of an active event on `date`, grouped by venue.
pub async fn event_showtimes(
    catalog: &dyn CatalogStore,
    event_id: i32,
    date: NaiveDate,
) -> AppResult<EventDay> {
    let event = find_active_event(catalog, event_id).await?;

    let slots = catalog.schedule_slots(ShowtimeScope::Event(event_id), date).await?;
    debug!(event_id, %date, schedules = slots.len(), "event showtimes loaded");

    let showtimes = attach_tickets(catalog, slots).await?;
    Ok(EventDay {
        event,
        date,
        venues: group_by_venue(showtimes),
    })
}

pub async fn find_active_venue(catalog: &dyn CatalogStore, venue_id: i32) -> AppResult<Venue> {
    let venue_id = require_positive(venue_id, "venue_id")?;
    catalog
        .find_venue(venue_id)
        .await?
        .filter(|v| v.is_active)
        .ok_or(AppError::NotFound("Venue"))
}

pub async fn find_active_event(catalog: &dyn CatalogStore, event_id: i32) -> AppResult<Event> {
    let event_id = require_positive(event_id, "event_id")?;
    catalog
        .find_event(event_id)
        .await?
        .filter(|e| e.is_active)
        .ok_or(AppError::NotFound("Event"))
}

/// A single active schedule with its ticket breakdown, for the booking page.
pub async fn showtime(catalog: &dyn CatalogStore, event_schedule_id: i32) -> AppResult<Showtime> {
    let event_schedule_id = require_positive(event_schedule_id, "event_schedule_id")?;
    let slot = catalog
        .schedule_slot(event_schedule_id)
        .await?
        .ok_or(AppError::NotFound("Showtime"))?;
    let tickets = catalog.ticket_subtotals(event_schedule_id).await?;
    Ok(Showtime::new(slot, tickets))
}
