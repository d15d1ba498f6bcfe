//! Server-rendered HTML.
//!
//! Full pages go through [`layout`]; fragment endpoints return the bare
//! markup produced by [`showtimes`] so the page script can swap it in.

pub mod pages;
pub mod showtimes;

use std::fmt::Write as _;

use crate::models::User;
use crate::routes::Route;
use crate::session::FlashMessage;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn error_banner(message: &str) -> String {
    format!(
        r#"<div class="error-banner" role="alert">{}</div>"#,
        escape(message)
    )
}

fn flash_list(flash: &[FlashMessage]) -> String {
    if flash.is_empty() {
        return String::new();
    }
    let mut html = String::from(r#"<ul class="flash">"#);
    for message in flash {
        let _ = write!(
            html,
            r#"<li class="{}">{}</li>"#,
            message.level.css_class(),
            escape(&message.text)
        );
    }
    html.push_str("</ul>");
    html
}

fn nav(user: Option<&User>) -> String {
    let mut html = format!(
        r#"<nav><a class="brand" href="{}">Catchify</a>"#,
        Route::Home.path()
    );
    match user {
        Some(user) => {
            if user.is_admin {
                let _ = write!(html, r#"<a href="{}">Dashboard</a>"#, Route::AdminDashboard.path());
            }
            let _ = write!(
                html,
                r#"<span class="user">{}</span><form method="post" action="{}"><button type="submit">Log out</button></form>"#,
                escape(&user.display_name()),
                Route::Logout.path()
            );
        }
        None => {
            let _ = write!(
                html,
                r#"<a href="{}">Log in</a><a href="{}">Register</a>"#,
                Route::Login.path(),
                Route::Register.path()
            );
        }
    }
    html.push_str("</nav>");
    html
}

pub fn layout(title: &str, user: Option<&User>, flash: &[FlashMessage], body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Catchify</title>
<style>{STYLE}</style>
</head>
<body>
{nav}
<main>
{flash}
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        nav = nav(user),
        flash = flash_list(flash),
        body = body,
    )
}

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;color:#1d1d1f}\
nav{display:flex;gap:1rem;align-items:center;padding:.75rem 1.5rem;background:#111;color:#fff}\
nav a{color:#fff;text-decoration:none}nav form{margin:0}\
main{max-width:960px;margin:0 auto;padding:1.5rem}\
.flash{list-style:none;padding:0}.flash li{padding:.5rem .75rem;border-radius:4px;margin-bottom:.5rem}\
.flash-success{background:#e3f6e5}.flash-info{background:#e6f0fb}.flash-error{background:#fde8e8}\
.error-banner{padding:.75rem;background:#fde8e8;border:1px solid #f5b5b5;border-radius:4px}\
.date-strip{display:flex;gap:.5rem;list-style:none;padding:0}\
.date-strip a{display:block;padding:.5rem;border:1px solid #ccc;border-radius:4px;text-decoration:none;color:inherit}\
.date-strip .selected a{background:#111;color:#fff}\
.slot{display:inline-block;margin:.25rem;padding:.5rem;border-radius:4px;border:1px solid #ccc}\
.slot.available{border-color:#2e7d32}.slot.few-left{border-color:#ef6c00}.slot.sold-out{opacity:.5}\
.no-shows{color:#666}";
