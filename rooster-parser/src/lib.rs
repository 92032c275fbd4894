mod dedupe;
mod error;
mod exporter;
mod ics;
mod month;
mod parser;
mod structs;

#[cfg(feature = "html")]
mod html;

pub use dedupe::dedupe;
pub use error::{ConfigError, LabelError};
pub use exporter::Exporter;
pub use ics::{serialize, DEFAULT_SUMMARY, PRODUCT_ID, UID_DOMAIN};
pub use month::resolve_month;
pub use parser::{parse_label, LabelParser};
pub use structs::{Calendar, Event};

#[cfg(feature = "html")]
pub use html::extract_labels;

/// Zone every wall-clock time is interpreted in unless configured otherwise.
pub const DEFAULT_TIMEZONE: chrono_tz::Tz = chrono_tz::Europe::Amsterdam;
