use thiserror::Error;

/// Why a single label was dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("no weekday, date and time range found")]
    StructuralMismatch,

    #[error("unknown month name `{0}`")]
    UnresolvedMonth(String),

    #[error("impossible date or time")]
    InvalidTimestamp,
}

/// Invalid pipeline configuration, reported before any label is processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("time zone identifier is empty")]
    EmptyTimeZone,

    #[error("unknown time zone `{0}`")]
    UnknownTimeZone(String),
}
