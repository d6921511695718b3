use thiserror::Error;

use tl_core::ValidationError;

/// Errors raised while reading, writing or interpreting a task store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A task identifier failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A log line did not have exactly three fields.
    #[error("malformed record on line {line}: expected 3 fields, found {fields}")]
    MalformedRecord { line: usize, fields: usize },
    /// A timestamp could not be parsed.
    #[error("malformed timestamp on line {line}: {value:?}")]
    MalformedTimestamp {
        line: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A log could not be tokenized, e.g. it was not valid UTF-8.
    #[error("malformed log on line {line}: {message}")]
    MalformedLog { line: usize, message: String },
    /// A calendar document was structurally broken.
    #[error("malformed calendar on line {line}: {message}")]
    MalformedCalendar { line: usize, message: String },
    /// An unknown export or storage format token.
    #[error("invalid format {0:?}")]
    UnsupportedFormat(String),
    /// The backing store could not be opened, read, written or positioned.
    #[error("backing store error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        let line = crate::codec::log::line_of(err.position());
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::Io(source),
            _ => Self::MalformedLog { line, message },
        }
    }
}
