//! Error types for the pizzapets_io crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    /// Reading or writing fixture and history files.
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// Malformed fixtures, history lines or payloads.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The shared fixture could not be read or swapped.
    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    #[must_use]
    pub fn fixture<S: Into<String>>(msg: S) -> Self {
        Self::Fixture(msg.into())
    }

    /// Names the file or step that failed.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
