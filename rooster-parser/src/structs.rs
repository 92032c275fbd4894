use chrono::DateTime;
use chrono_tz::Tz;

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

#[cfg(feature = "serde")]
fn serialize_local_datetime<S: Serializer>(
    datetime: &DateTime<Tz>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let formatted = datetime.format("%Y-%m-%dT%H:%M:%S%:z").to_string();
    serializer.serialize_str(&formatted)
}

/// Deduplicated, start-ordered events sharing one time zone.
///
/// Only built by [`crate::Exporter::calendar`], so the events are always unique,
/// ordered, and parsed in the zone named by `timezone`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Calendar {
    pub(crate) timezone: String,
    pub(crate) events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Event {
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_local_datetime"))]
    pub start: DateTime<Tz>,
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_local_datetime"))]
    pub end: DateTime<Tz>,
    pub title: String,
    pub location: String,
}

pub(crate) type EventKey = (i64, i64, String, String);

impl Event {
    /// Identity used for de-duplication.
    pub(crate) fn key(&self) -> EventKey {
        (
            self.start.timestamp_millis(),
            self.end.timestamp_millis(),
            self.title.clone(),
            self.location.clone(),
        )
    }
}

impl Calendar {
    /// Builds a calendar from raw candidates, dropping duplicates and ordering by start.
    pub(crate) fn new<S, I>(timezone: S, events: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = Event>,
    {
        Calendar {
            timezone: timezone.into(),
            events: crate::dedupe(events),
        }
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
