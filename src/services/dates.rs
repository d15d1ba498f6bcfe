use chrono::{Days, Local, NaiveDate};

/// Number of days shown in the showtime date strip.
pub const STRIP_DAYS: u64 = 7;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses an ISO `YYYY-MM-DD` date. Missing or malformed input means `today`.
pub fn parse_date_or(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or(today)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
}

impl StripDay {
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn weekday_label(&self) -> String {
        if self.is_today {
            "Today".to_string()
        } else {
            self.date.format("%a").to_string()
        }
    }

    pub fn day_label(&self) -> String {
        self.date.format("%d %b").to_string()
    }
}

/// Seven consecutive days starting at `today`.
pub fn date_strip(today: NaiveDate, selected: NaiveDate) -> Vec<StripDay> {
    (0..STRIP_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| StripDay {
            date,
            is_today: date == today,
            is_selected: date == selected,
        })
        .collect()
}
