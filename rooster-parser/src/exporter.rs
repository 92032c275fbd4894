use chrono_tz::Tz;
use log::debug;

use crate::{Calendar, ConfigError, LabelParser};

/// Label-to-calendar pipeline bound to one time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exporter {
    timezone: String,
    parser: LabelParser,
}

impl Exporter {
    pub fn new(timezone: &str) -> Result<Self, ConfigError> {
        let timezone = timezone.trim();
        if timezone.is_empty() {
            return Err(ConfigError::EmptyTimeZone);
        }

        let tz = timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimeZone(timezone.to_string()))?;

        Ok(Self {
            timezone: timezone.to_string(),
            parser: LabelParser::new(tz),
        })
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn parser(&self) -> &LabelParser {
        &self.parser
    }

    /// Parses every label, drops the ones that are not events and removes duplicates.
    pub fn calendar<I, S>(&self, labels: I) -> Calendar
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut total = 0;
        let candidates = labels
            .into_iter()
            .inspect(|_| total += 1)
            .filter_map(|label| self.parser.parse(label.as_ref()))
            .collect::<Vec<_>>();

        let parsed = candidates.len();
        let calendar = Calendar::new(self.timezone.as_str(), candidates);

        debug!(
            "{total} labels, {parsed} events, {} after removing duplicates",
            calendar.len()
        );

        calendar
    }

    /// Splits a document into labels: HTML snapshots of the week view yield
    /// their event tiles, anything else is read as one label per line.
    pub fn labels_from_document(text: &str) -> Vec<String> {
        if let Some(labels) = html_labels(text) {
            return labels;
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(feature = "html")]
fn html_labels(text: &str) -> Option<Vec<String>> {
    text.trim_start()
        .starts_with('<')
        .then(|| crate::extract_labels(text))
}

#[cfg(not(feature = "html"))]
fn html_labels(_text: &str) -> Option<Vec<String>> {
    None
}
