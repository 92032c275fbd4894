use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Calendar, Event};

pub const PRODUCT_ID: &str = "-//HMC//Rooster Export//NL";

/// Domain part of every generated UID.
pub const UID_DOMAIN: &str = "hmc";

/// Title used when a label carries none.
pub const DEFAULT_SUMMARY: &str = "Les";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Renders events as an iCalendar document with CRLF line endings.
///
/// Start and end are qualified with `timezone` and written as captured wall-clock
/// time. Free text is not escaped beyond folding line breaks into spaces.
pub fn serialize(events: &[Event], timezone: &str) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        format!("PRODID:{PRODUCT_ID}"),
    ];

    for event in events {
        lines.extend(event.to_ics(timezone));
    }

    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n")
}

fn fold_line_breaks(text: &str) -> String {
    LINE_BREAK.replace_all(text, " ").into_owned()
}

fn local_datetime(datetime: &DateTime<Tz>) -> String {
    datetime.naive_local().format("%Y%m%dT%H%M00").to_string()
}

impl Calendar {
    #[must_use]
    pub fn to_ics(&self) -> String {
        serialize(&self.events, &self.timezone)
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ics())
    }
}

impl Event {
    /// Identifier that stays the same across exports of the same lesson.
    #[must_use]
    pub fn uid(&self) -> String {
        let slug = format!("{}|{}", self.title, self.location);
        format!(
            "{}-{}@{UID_DOMAIN}",
            self.start.timestamp_millis(),
            WHITESPACE.replace_all(&slug, "_")
        )
    }

    #[must_use]
    pub fn summary(&self) -> String {
        if self.title.is_empty() {
            return DEFAULT_SUMMARY.to_string();
        }

        fold_line_breaks(&self.title)
    }

    /// Content lines of the VEVENT block, without line terminators.
    #[must_use]
    pub fn to_ics(&self, timezone: &str) -> Vec<String> {
        vec![
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid()),
            format!("SUMMARY:{}", self.summary()),
            format!("LOCATION:{}", fold_line_breaks(&self.location)),
            format!("DTSTART;TZID={timezone}:{}", local_datetime(&self.start)),
            format!("DTEND;TZID={timezone}:{}", local_datetime(&self.end)),
            "END:VEVENT".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Europe::Amsterdam;

    use super::*;

    fn wiskunde() -> Event {
        Event {
            start: Amsterdam.with_ymd_and_hms(2025, 2, 3, 14, 0, 0).unwrap(),
            end: Amsterdam.with_ymd_and_hms(2025, 2, 3, 15, 30, 0).unwrap(),
            title: "Wiskunde B".into(),
            location: "Hoofdgebouw - A101".into(),
        }
    }

    #[test]
    fn empty_calendar() {
        assert_eq!(
            serialize(&[], "Europe/Amsterdam"),
            "BEGIN:VCALENDAR\r\n\
             VERSION:2.0\r\n\
             CALSCALE:GREGORIAN\r\n\
             METHOD:PUBLISH\r\n\
             PRODID:-//HMC//Rooster Export//NL\r\n\
             END:VCALENDAR"
        );
    }

    #[test]
    fn single_event() {
        assert_eq!(
            serialize(&[wiskunde()], "Europe/Amsterdam"),
            "BEGIN:VCALENDAR\r\n\
             VERSION:2.0\r\n\
             CALSCALE:GREGORIAN\r\n\
             METHOD:PUBLISH\r\n\
             PRODID:-//HMC//Rooster Export//NL\r\n\
             BEGIN:VEVENT\r\n\
             UID:1738587600000-Wiskunde_B|Hoofdgebouw_-_A101@hmc\r\n\
             SUMMARY:Wiskunde B\r\n\
             LOCATION:Hoofdgebouw - A101\r\n\
             DTSTART;TZID=Europe/Amsterdam:20250203T140000\r\n\
             DTEND;TZID=Europe/Amsterdam:20250203T153000\r\n\
             END:VEVENT\r\n\
             END:VCALENDAR"
        );
    }

    #[test]
    fn uid_collapses_whitespace_runs() {
        let mut event = wiskunde();
        event.title = "Wiskunde \t  B\n".into();
        event.location = String::new();

        assert_eq!(event.uid(), "1738587600000-Wiskunde_B_|@hmc");
    }

    #[test]
    fn summary_folds_line_breaks() {
        let mut event = wiskunde();
        event.title = "Wiskunde\r\nB\nextra\rles".into();

        assert_eq!(event.summary(), "Wiskunde B extra les");
    }

    #[test]
    fn location_folds_line_breaks() {
        let mut event = wiskunde();
        event.location = "Noord\rZuid\r\nA101\n".into();

        let lines = event.to_ics("Europe/Amsterdam");
        assert_eq!(lines[3], "LOCATION:Noord Zuid A101 ");

        let ics = serialize(&[event], "Europe/Amsterdam");
        assert!(!ics.replace("\r\n", "").contains(['\r', '\n']));
    }

    #[test]
    fn summary_placeholder_for_empty_title() {
        let mut event = wiskunde();
        event.title = String::new();

        assert_eq!(event.summary(), DEFAULT_SUMMARY);
        assert!(event.uid().ends_with("-|Hoofdgebouw_-_A101@hmc"));
    }

    #[test]
    fn empty_location_and_unescaped_punctuation() {
        let mut event = wiskunde();
        event.title = "Wiskunde; herhaling, deel 2".into();
        event.location = String::new();

        let lines = event.to_ics("Europe/Amsterdam");
        assert!(lines.contains(&"SUMMARY:Wiskunde; herhaling, deel 2".to_string()));
        assert!(lines.contains(&"LOCATION:".to_string()));
    }

    #[test]
    fn writes_wall_clock_in_the_given_zone() {
        let event = Event {
            start: chrono_tz::Asia::Tokyo.with_ymd_and_hms(2025, 7, 1, 9, 5, 0).unwrap(),
            end: chrono_tz::Asia::Tokyo.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap(),
            title: "Japans".into(),
            location: String::new(),
        };

        let lines = event.to_ics("Asia/Tokyo");
        assert_eq!(lines[4], "DTSTART;TZID=Asia/Tokyo:20250701T090500");
        assert_eq!(lines[5], "DTEND;TZID=Asia/Tokyo:20250701T100000");
    }

    #[test]
    fn output_is_reproducible() {
        let calendar = Calendar::new("Europe/Amsterdam", vec![wiskunde()]);
        assert_eq!(calendar.to_ics(), calendar.to_ics());
        assert_eq!(calendar.to_string(), calendar.to_ics());
    }
}
