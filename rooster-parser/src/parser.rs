use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{resolve_month, Event, LabelError, DEFAULT_SUMMARY, DEFAULT_TIMEZONE};

macro_rules! regex {
    ($pattern:expr) => {{
        static REGEX: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).unwrap());
        &REGEX
    }};
}

macro_rules! date_pattern {
    () => {
        r"(?i)(?:maandag|dinsdag|woensdag|donderdag|vrijdag|zaterdag|zondag)\s+(?P<day>\d{1,2})\s+(?P<month>\p{L}+)\s+(?P<year>20\d{2}),"
    };
}

macro_rules! time_range_pattern {
    () => {
        r"(?P<start_hour>\d{1,2}):(?P<start_minute>\d{2})\s*-\s*(?P<end_hour>\d{1,2}):(?P<end_minute>\d{2})"
    };
}

macro_rules! lesson_keyword {
    () => {
        r"(?:les|toets|tentamen|examen|practicum|werkcollege|hoorcollege)\b"
    };
}

macro_rules! facility_keyword {
    () => {
        r"\b(?:locatie|gebouw|vestiging|lokaal)\b"
    };
}

macro_rules! room_code {
    () => {
        r"[a-z]?\d{1,4}[a-z]?"
    };
}

/// Date and time range found in a label, together with the text around it.
struct Timeslot<'a> {
    day: u32,
    month: &'a str,
    year: i32,
    start: (u32, u32),
    end: (u32, u32),
    before: &'a str,
    between: &'a str,
    after: &'a str,
}

impl<'a> Timeslot<'a> {
    fn find(label: &'a str) -> Option<Self> {
        let adjacent = regex!(concat!(date_pattern!(), r"\s*", time_range_pattern!()));
        let interposed = regex!(concat!(
            date_pattern!(),
            r"\s*(?P<between>[^\r\n]+?)\s+",
            time_range_pattern!()
        ));

        [adjacent, interposed]
            .into_iter()
            .find_map(|pattern| pattern.captures(label))
            .and_then(|captures| Self::from_captures(label, &captures))
    }

    fn from_captures(label: &'a str, captures: &Captures<'a>) -> Option<Self> {
        let whole = captures.get(0)?;
        let number = |name: &str| captures.name(name)?.as_str().parse::<u32>().ok();

        Some(Timeslot {
            day: number("day")?,
            month: captures.name("month")?.as_str(),
            year: captures.name("year")?.as_str().parse().ok()?,
            start: (number("start_hour")?, number("start_minute")?),
            end: (number("end_hour")?, number("end_minute")?),
            before: &label[..whole.start()],
            between: captures.name("between").map_or("", |between| between.as_str()),
            after: &label[whole.end()..],
        })
    }

    /// Text outside the date and time range, nearest to it first.
    fn surroundings(&self) -> [&'a str; 3] {
        [self.between, self.after, self.before]
    }
}

/// One way of pulling a field out of a label. Strategies are tried in order
/// and the first hit wins.
type Extractor = fn(&str, &Timeslot<'_>) -> Option<String>;

const TITLE_EXTRACTORS: [Extractor; 2] = [title_next_to_timeslot, title_from_segment];

const LOCATION_EXTRACTORS: [Extractor; 2] = [location_from_facility, location_from_room_suffix];

fn first_match(extractors: &[Extractor], label: &str, slot: &Timeslot<'_>) -> Option<String> {
    extractors
        .iter()
        .find_map(|extractor| extractor(label, slot))
}

/// A piece of surrounding text that opens with a lesson keyword.
fn title_next_to_timeslot(_label: &str, slot: &Timeslot<'_>) -> Option<String> {
    let pattern = regex!(concat!(
        r"(?i)^[\s,]*",
        lesson_keyword!(),
        r"\s*:?\s*(?P<title>[^,\r\n]+)"
    ));

    slot.surroundings()
        .into_iter()
        .filter_map(|text| pattern.captures(text))
        .find_map(|captures| clean_title(&captures["title"]))
}

/// Any comma-separated segment of the label that opens with a lesson keyword.
fn title_from_segment(label: &str, _slot: &Timeslot<'_>) -> Option<String> {
    let pattern = regex!(concat!(
        r"(?i)(?:^|,)\s*",
        lesson_keyword!(),
        r"\s*:?\s*(?P<title>[^,\r\n]+)"
    ));

    pattern
        .captures_iter(label)
        .find_map(|captures| clean_title(&captures["title"]))
}

fn clean_title(raw: &str) -> Option<String> {
    let room_suffix = regex!(concat!(r"(?i)\s+-\s+", room_code!(), r"\s*$"));

    let title = room_suffix.replace(raw.trim(), "");
    let title = title.trim();

    (!title.is_empty()).then(|| title.to_string())
}

/// A facility keyword followed by a site name and an optional room code.
fn location_from_facility(_label: &str, slot: &Timeslot<'_>) -> Option<String> {
    let pattern = regex!(concat!(
        r"(?i)",
        facility_keyword!(),
        r"\s*:?\s*(?P<site>[^,\r\n]+?)(?:\s+(?:-\s+)?(?P<room>",
        room_code!(),
        r"))?\s*(?:,|$)"
    ));

    slot.surroundings()
        .into_iter()
        .flat_map(|text| pattern.captures_iter(text))
        .find_map(|captures| {
            let site = captures["site"].trim().trim_end_matches('-').trim_end();
            if site.is_empty() {
                return None;
            }

            Some(match captures.name("room") {
                Some(room) => format!("{site} - {}", room.as_str()),
                None => site.to_string(),
            })
        })
}

/// A bare room code closing a segment, as in `Wiskunde - A101`.
fn location_from_room_suffix(_label: &str, slot: &Timeslot<'_>) -> Option<String> {
    let pattern = regex!(concat!(
        r"(?i)\s-\s+(?P<room>",
        room_code!(),
        r")\s*(?:,|$)"
    ));

    slot.surroundings()
        .into_iter()
        .find_map(|text| pattern.captures(text))
        .map(|captures| captures["room"].to_string())
}

/// Turns schedule labels into events in a fixed time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelParser {
    timezone: Tz,
}

impl Default for LabelParser {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl LabelParser {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Parses a label, or returns `None` if it does not describe an event.
    pub fn parse(&self, label: &str) -> Option<Event> {
        match self.try_parse(label) {
            Ok(event) => Some(event),
            Err(err) => {
                debug!("Dropping label {label:?}: {err}");
                None
            }
        }
    }

    pub fn try_parse(&self, label: &str) -> Result<Event, LabelError> {
        let slot = Timeslot::find(label).ok_or(LabelError::StructuralMismatch)?;

        let month = resolve_month(slot.month)
            .ok_or_else(|| LabelError::UnresolvedMonth(slot.month.to_string()))?;

        let date = NaiveDate::from_ymd_opt(slot.year, month, slot.day)
            .ok_or(LabelError::InvalidTimestamp)?;

        let start = self.local_timestamp(date, slot.start)?;
        let end = self.local_timestamp(date, slot.end)?;

        if end <= start {
            return Err(LabelError::InvalidTimestamp);
        }

        let title = first_match(&TITLE_EXTRACTORS, label, &slot)
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

        let location = first_match(&LOCATION_EXTRACTORS, label, &slot).unwrap_or_default();

        Ok(Event {
            start,
            end,
            title,
            location,
        })
    }

    fn local_timestamp(
        &self,
        date: NaiveDate,
        (hour, minute): (u32, u32),
    ) -> Result<DateTime<Tz>, LabelError> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or(LabelError::InvalidTimestamp)?;

        // Falls back to the earlier instant on DST overlap; DST gaps have no instant at all.
        self.timezone
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .ok_or(LabelError::InvalidTimestamp)
    }
}

/// Parses a label in the default time zone.
pub fn parse_label(label: &str) -> Option<Event> {
    LabelParser::default().parse(label)
}
