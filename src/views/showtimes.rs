use std::fmt::Write as _;

use chrono::NaiveDate;

use super::escape;
use crate::models::{Event, Review, TicketSubtotal, Venue};
use crate::routes::Route;
use crate::services::dates::StripDay;
use crate::services::showtimes::{Availability, EventDay, Showtime, VenueDay};

// Loads the fragment for the clicked day without a full navigation.
// Plain links keep working when scripts are off.
const STRIP_SCRIPT: &str = r#"<script>
document.querySelectorAll('.date-strip a').forEach(function (link) {
  link.addEventListener('click', function (ev) {
    ev.preventDefault();
    var target = document.getElementById('showtimes');
    fetch(link.dataset.fragment)
      .then(function (res) { return res.text(); })
      .then(function (html) {
        target.innerHTML = html;
        document.querySelectorAll('.date-strip li').forEach(function (li) { li.classList.remove('selected'); });
        link.parentElement.classList.add('selected');
        history.replaceState(null, '', link.href);
      })
      .catch(function () {
        target.innerHTML = '<div class="error-banner">Could not load showtimes.</div>';
      });
  });
});
</script>"#;

fn no_shows(date: NaiveDate) -> String {
    format!(
        r#"<p class="no-shows">No shows scheduled for {}.</p>"#,
        date.format("%A, %d %B %Y")
    )
}

fn ticket_rows(tickets: &[TicketSubtotal]) -> String {
    if tickets.is_empty() {
        return String::new();
    }
    let mut html = String::from(r#"<ul class="tickets">"#);
    for t in tickets {
        let _ = write!(
            html,
            r#"<li><span class="ticket-type">{}</span> <span class="price">{:.2}</span> <span class="seats">{}/{}</span></li>"#,
            escape(&t.ticket_type),
            t.ticket_price,
            t.available_seats,
            t.total_seats
        );
    }
    html.push_str("</ul>");
    html
}

fn slot_card(showtime: &Showtime) -> String {
    let status = showtime.status.as_str();
    let mut html = format!(
        r#"<div class="slot {status}" data-schedule="{id}" data-status="{status}">"#,
        id = showtime.slot.event_schedule_id,
    );
    let _ = write!(
        html,
        r#"<div class="time">{}</div><div class="seats">{}</div><div class="price">{}</div>"#,
        showtime.time_label(),
        showtime.seats_label(),
        showtime.price_label()
    );
    html.push_str(&ticket_rows(&showtime.tickets));

    if showtime.status.is_bookable() {
        let booking = Route::Booking.url(&[("event_schedule_id", showtime.slot.event_schedule_id)]);
        let _ = write!(html, r#"<a class="book" href="{}">Book</a>"#, escape(&booking));
    } else {
        html.push_str(r#"<span class="book disabled">Sold out</span>"#);
    }
    html.push_str("</div>");
    html
}

/// Fragment: a venue's shows for one day, grouped by event.
pub fn venue_fragment(day: &VenueDay) -> String {
    if day.events.is_empty() {
        return no_shows(day.date);
    }
    let mut html = String::new();
    for group in &day.events {
        let event_link = Route::EventShowtimes.url(&[
            ("event_id", group.event_id.to_string()),
            ("date", day.date.format("%Y-%m-%d").to_string()),
        ]);
        let _ = write!(
            html,
            r#"<section class="event-group" data-event="{id}"><h3><a href="{link}">{name}</a></h3><p class="meta">{kind} · {genre} · {lang}</p>"#,
            id = group.event_id,
            link = escape(&event_link),
            name = escape(&group.event_name),
            kind = escape(&group.event_type),
            genre = escape(&group.event_genre),
            lang = escape(&group.event_language),
        );
        for showtime in &group.showtimes {
            html.push_str(&slot_card(showtime));
        }
        html.push_str("</section>");
    }
    html
}

/// Fragment: an event's shows for one day, grouped by venue.
pub fn event_fragment(day: &EventDay) -> String {
    if day.venues.is_empty() {
        return no_shows(day.date);
    }
    let mut html = String::new();
    for group in &day.venues {
        let venue_link = Route::VenueShowtimes.url(&[
            ("venue_id", group.venue_id.to_string()),
            ("date", day.date.format("%Y-%m-%d").to_string()),
        ]);
        let _ = write!(
            html,
            r#"<section class="venue-group" data-venue="{id}"><h3><a href="{link}">{name}</a></h3>"#,
            id = group.venue_id,
            link = escape(&venue_link),
            name = escape(&group.venue_name),
        );
        for showtime in &group.showtimes {
            html.push_str(&slot_card(showtime));
        }
        html.push_str("</section>");
    }
    html
}

fn date_strip(days: &[StripDay], page: Route, fragment: Route, id_key: &str, id: i32) -> String {
    let mut html = String::from(r#"<ul class="date-strip">"#);
    for day in days {
        let query = [(id_key, id.to_string()), ("date", day.iso())];
        let _ = write!(
            html,
            r#"<li class="{class}"><a href="{href}" data-fragment="{frag}"><span class="weekday">{weekday}</span> <span class="day">{label}</span></a></li>"#,
            class = if day.is_selected { "selected" } else { "" },
            href = escape(&page.url(&query)),
            frag = escape(&fragment.url(&query)),
            weekday = day.weekday_label(),
            label = day.day_label(),
        );
    }
    html.push_str("</ul>");
    html
}

fn showtimes_container(fragment_url: &str) -> String {
    format!(
        r#"<div id="showtimes" data-src="{src}"><noscript>Enable scripts or pick a day above.</noscript></div>
<script>
(function () {{
  var target = document.getElementById('showtimes');
  fetch(target.dataset.src)
    .then(function (res) {{ return res.text(); }})
    .then(function (html) {{ target.innerHTML = html; }})
    .catch(function () {{ target.innerHTML = '<div class="error-banner">Could not load showtimes.</div>'; }});
}})();
</script>"#,
        src = escape(fragment_url)
    )
}

fn review_list(reviews: &[Review], viewer: Option<i32>, return_to: &str) -> String {
    let mut html = String::from(r#"<section class="reviews"><h2>Reviews</h2>"#);
    if reviews.is_empty() {
        html.push_str(r#"<p class="no-reviews">No reviews yet.</p>"#);
    }
    for review in reviews {
        let _ = write!(
            html,
            r#"<article class="review" data-review="{id}"><header><strong>{author}</strong> <span class="rating">{rating}/5</span> <time>{when}</time></header><p>{text}</p>"#,
            id = review.review_id,
            author = escape(&review.author_name),
            rating = review.rating,
            when = review.created_at.format("%d %b %Y"),
            text = escape(&review.review_text),
        );
        if viewer.is_some_and(|uid| review.is_owned_by(uid)) {
            let _ = write!(
                html,
                r#"<form method="post" action="{action}"><input type="hidden" name="review_id" value="{id}"><input type="hidden" name="return_to" value="{ret}"><button type="submit">Delete</button></form>"#,
                action = Route::DeleteReview.path(),
                id = review.review_id,
                ret = escape(return_to),
            );
        }
        html.push_str("</article>");
    }
    html.push_str("</section>");
    html
}

/// Body of the event detail page: header, date strip, deferred slots, reviews.
pub fn event_page(
    event: &Event,
    strip: &[StripDay],
    selected: NaiveDate,
    reviews: &[Review],
    viewer: Option<i32>,
) -> String {
    let iso = selected.format("%Y-%m-%d").to_string();
    let query = [("event_id", event.event_id.to_string()), ("date", iso)];
    let here = Route::EventShowtimes.url(&query);
    let fragment = Route::EventShowtimesFragment.url(&query);

    format!(
        r#"<header class="event"><h1>{name}</h1><p class="meta">{kind} · {genre} · {lang} · {duration}</p></header>
{strip}
{container}
{reviews}
{script}"#,
        name = escape(&event.event_name),
        kind = escape(&event.event_type),
        genre = escape(&event.event_genre),
        lang = escape(&event.event_language),
        duration = event.duration_label(),
        strip = date_strip(strip, Route::EventShowtimes, Route::EventShowtimesFragment, "event_id", event.event_id),
        container = showtimes_container(&fragment),
        reviews = review_list(reviews, viewer, &here),
        script = STRIP_SCRIPT,
    )
}

/// Body of the venue page: header, date strip, deferred slots.
pub fn venue_page(venue: &Venue, strip: &[StripDay], selected: NaiveDate) -> String {
    let query = [
        ("venue_id", venue.venue_id.to_string()),
        ("date", selected.format("%Y-%m-%d").to_string()),
    ];
    let fragment = Route::VenueShowtimesFragment.url(&query);

    format!(
        r#"<header class="venue"><h1>{name}</h1><p class="meta">{address}, {city}</p></header>
{strip}
{container}
{script}"#,
        name = escape(&venue.venue_name),
        address = escape(&venue.venue_address),
        city = escape(&venue.venue_city),
        strip = date_strip(strip, Route::VenueShowtimes, Route::VenueShowtimesFragment, "venue_id", venue.venue_id),
        container = showtimes_container(&fragment),
        script = STRIP_SCRIPT,
    )
}

/// Body of the booking page for one slot.
pub fn booking_page(showtime: &Showtime) -> String {
    let slot = &showtime.slot;
    let venue_link = Route::VenueShowtimes.url(&[
        ("venue_id", slot.venue_id.to_string()),
        ("date", slot.slot_starts_at.format("%Y-%m-%d").to_string()),
    ]);
    format!(
        r#"<header class="booking"><h1>{event}</h1><p><a href="{venue_link}">{venue}</a> · {date} · {time}</p></header>
<p class="status {status}">{status_text}: {seats} seats available</p>
{tickets}"#,
        event = escape(&slot.event_name),
        venue_link = escape(&venue_link),
        venue = escape(&slot.venue_name),
        date = slot.slot_starts_at.format("%A, %d %B %Y"),
        time = showtime.time_label(),
        status = showtime.status.as_str(),
        status_text = match showtime.status {
            Availability::SoldOut => "Sold out",
            Availability::FewLeft => "Few left",
            Availability::Available => "Available",
        },
        seats = showtime.seats_label(),
        tickets = ticket_rows(&showtime.tickets),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleSlot;

    fn showtime(available: i64) -> Showtime {
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap().and_hms_opt(18, 30, 0).unwrap();
        Showtime::new(
            ScheduleSlot {
                event_schedule_id: 42,
                event_id: 1,
                event_name: "Hamlet".into(),
                event_type: "Play".into(),
                event_genre: "Drama".into(),
                event_duration: 150,
                event_language: "English".into(),
                venue_id: 5,
                venue_name: "Globe".into(),
                slot_starts_at: start,
                slot_ends_at: start + chrono::Duration::minutes(150),
                min_price: 100.0,
                max_price: 250.0,
                total_seats: 10,
                available_seats: available,
            },
            vec![TicketSubtotal {
                ticket_type: "Balcony".into(),
                ticket_price: 100.0,
                total_seats: 10,
                available_seats: available,
            }],
        )
    }

    #[test]
    fn date_strip_loader_replaces_stale_slots_on_failure() {
        let handler = &STRIP_SCRIPT[STRIP_SCRIPT.find("fetch(link.dataset.fragment)").unwrap()..];
        assert!(handler.contains(".catch("));
        assert!(handler.contains("Could not load showtimes."));
    }

    #[test]
    fn slot_card_marks_status_and_booking_link() {
        let html = slot_card(&showtime(3));
        assert!(html.contains(r#"data-status="few-left""#));
        assert!(html.contains("3/10"));
        assert!(html.contains("18:30 - 21:00"));
        assert!(html.contains("/booking?event_schedule_id=42"));

        let sold_out = slot_card(&showtime(0));
        assert!(sold_out.contains("sold-out"));
        assert!(!sold_out.contains("/booking?"));
    }
}
