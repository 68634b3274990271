use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenerError {
    #[error("No spot price in snapshot {}", path.display())]
    MissingSpotPrice { path: PathBuf },

    #[error("`direction` must be set to run the {generator} generator")]
    MissingDirection { generator: &'static str },

    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed range `{field}`: {reason}")]
    MalformedRange { field: String, reason: String },

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Unknown rank key `{0}` (expected rr, gain, loss, cost or credit)")]
    UnknownRankKey(String),

    #[error("Invalid direction `{value}` (expected LONG or SHORT)")]
    InvalidDirection { value: String },

    #[error("Cannot parse expiration date `{value}`: {source}")]
    InvalidExpiry {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, ScreenerError>;
