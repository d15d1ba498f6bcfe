use std::fmt::Write as _;

use super::escape;
use crate::models::{Event, Venue};
use crate::routes::Route;

pub fn home(events: &[Event], venues: &[Venue]) -> String {
    let mut html = String::from(r#"<h1>Now showing</h1><ul class="events">"#);
    if events.is_empty() {
        html.push_str(r#"<li class="empty">Nothing on right now.</li>"#);
    }
    for event in events {
        let _ = write!(
            html,
            r#"<li><a href="{}">{}</a> <span class="meta">{} · {}</span></li>"#,
            escape(&Route::EventShowtimes.url(&[("event_id", event.event_id)])),
            escape(&event.event_name),
            escape(&event.event_type),
            event.duration_label()
        );
    }
    html.push_str(r#"</ul><h2>Venues</h2><ul class="venues">"#);
    for venue in venues {
        let _ = write!(
            html,
            r#"<li><a href="{}">{}</a> <span class="meta">{}</span></li>"#,
            escape(&Route::VenueShowtimes.url(&[("venue_id", venue.venue_id)])),
            escape(&venue.venue_name),
            escape(&venue.venue_city)
        );
    }
    html.push_str("</ul>");
    html
}

fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape(e)))
        .collect();
    format!(r#"<ul class="form-errors">{items}</ul>"#)
}

fn return_to_field(return_to: Option<&str>) -> String {
    return_to
        .map(|r| format!(r#"<input type="hidden" name="return_to" value="{}">"#, escape(r)))
        .unwrap_or_default()
}

pub fn login_form(email: &str, return_to: Option<&str>, errors: &[String]) -> String {
    format!(
        r#"<h1>Log in</h1>
{errors}
<form method="post" action="{action}">
<label>Email <input type="email" name="email" value="{email}" required></label>
<label>Password <input type="password" name="password" required></label>
{return_to}
<button type="submit">Log in</button>
</form>
<p>New here? <a href="{register}">Create an account</a></p>"#,
        errors = error_list(errors),
        action = Route::Login.path(),
        email = escape(email),
        return_to = return_to_field(return_to),
        register = Route::Register.path(),
    )
}

pub struct RegisterValues<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub surname: &'a str,
}

pub fn register_form(values: &RegisterValues<'_>, errors: &[String]) -> String {
    format!(
        r#"<h1>Create an account</h1>
{errors}
<form method="post" action="{action}">
<label>First name <input name="first_name" value="{first}" required></label>
<label>Surname <input name="surname" value="{surname}" required></label>
<label>Email <input type="email" name="email" value="{email}" required></label>
<label>Password <input type="password" name="password" minlength="8" required></label>
<label>Confirm password <input type="password" name="confirm_password" minlength="8" required></label>
<button type="submit">Register</button>
</form>
<p>Already registered? <a href="{login}">Log in</a></p>"#,
        errors = error_list(errors),
        action = Route::Register.path(),
        first = escape(values.first_name),
        surname = escape(values.surname),
        email = escape(values.email),
        login = Route::Login.path(),
    )
}

const DASHBOARD_CARDS: [(&str, &str, Route); 3] = [
    ("Catalogue", "Browse events and venues currently on sale.", Route::Home),
    ("Accounts", "Create a customer account.", Route::Register),
    ("Health", "Database and session backend status.", Route::Health),
];

/// Static admin shell. Cards only link out; nothing here is data bound.
pub fn admin_dashboard(admin_name: &str) -> String {
    let mut html = format!(
        r#"<h1>Dashboard</h1><p class="welcome">Signed in as {}</p><div class="cards">"#,
        escape(admin_name)
    );
    for (title, blurb, route) in DASHBOARD_CARDS {
        let _ = write!(
            html,
            r#"<a class="card" href="{}"><h2>{}</h2><p>{}</p></a>"#,
            route.path(),
            title,
            blurb
        );
    }
    html.push_str("</div>");
    html
}
