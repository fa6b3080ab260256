use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypteaError {
    #[error("duration must be between 10 and 300 seconds (got {0})")]
    InvalidDuration(u64),

    #[error("language '{code}' not available (available: {})", .available.join(", "))]
    UnknownLanguage { code: String, available: Vec<String> },

    #[error("could not load language data for '{code}': {reason}")]
    LanguageLoad { code: String, reason: String },

    #[error("word bank for '{0}' is empty")]
    EmptyWordBank(String),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TypteaError>;
