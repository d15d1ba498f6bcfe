use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub event_id: i32,
    pub event_name: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub event_genre: String,
    /// Running time in minutes.
    pub event_duration: i32,
    pub event_language: String,
    pub is_active: bool,
}

impl Event {
    /// "2h 15m", or just "45m" under an hour.
    pub fn duration_label(&self) -> String {
        let hours = self.event_duration / 60;
        let minutes = self.event_duration % 60;
        match (hours, minutes) {
            (0, m) => format!("{m}m"),
            (h, 0) => format!("{h}h"),
            (h, m) => format!("{h}h {m}m"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(duration: i32) -> Event {
        Event {
            event_id: 1,
            event_name: "Dune".into(),
            event_type: "Movie".into(),
            event_genre: "Sci-Fi".into(),
            event_duration: duration,
            event_language: "English".into(),
            is_active: true,
        }
    }

    #[test]
    fn duration_label_formats_hours_and_minutes() {
        assert_eq!(event(45).duration_label(), "45m");
        assert_eq!(event(120).duration_label(), "2h");
        assert_eq!(event(135).duration_label(), "2h 15m");
    }
}
