use thiserror::Error;

/// Message shown to the user when no paragraph exists for the chosen selection.
pub const UNSUPPORTED_SELECTION_MESSAGE: &str =
    "Error fetching paragraph. Please select another language or level.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("no paragraphs for level '{level}' and language '{language}'")]
    UnsupportedSelection { level: String, language: String },

    #[error("unknown level: {0}")]
    UnknownLevel(String),

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
