use std::collections::HashSet;

use crate::Event;

/// Keeps the first occurrence of every `(start, end, title, location)` and
/// orders the survivors by start time. Events starting at the same instant
/// keep their input order.
pub fn dedupe<I: IntoIterator<Item = Event>>(events: I) -> Vec<Event> {
    let mut seen = HashSet::new();

    let mut unique = events
        .into_iter()
        .filter(|event| seen.insert(event.key()))
        .collect::<Vec<_>>();

    unique.sort_by_key(|event| event.start.timestamp_millis());
    unique
}
