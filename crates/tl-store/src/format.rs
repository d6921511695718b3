use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::StoreError;
use crate::codec::CalendarCodec;
use crate::repository::{CalendarRepository, LogRepository, TaskRepository};
use crate::store::FileStore;

/// On-disk format of a task file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Format {
    Csv,
    Ical,
    Ics,
}

impl Format {
    pub const ALL: [Self; 3] = [Self::Csv, Self::Ical, Self::Ics];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Ical => "ical",
            Self::Ics => "ics",
        }
    }

    /// File extension, including the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Ical | Self::Ics => ".ics",
        }
    }

    /// Opens a repository of this format backed by the file at `path`.
    ///
    /// Nothing is touched on disk until the repository is first read or written.
    pub fn open_file(self, path: &Path, calendar: &CalendarCodec) -> Box<dyn TaskRepository> {
        let store = FileStore::new(path);
        match self {
            Self::Csv => Box::new(LogRepository::new(store)),
            Self::Ical | Self::Ics => {
                Box::new(CalendarRepository::with_codec(store, calendar.clone()))
            }
        }
    }
}

impl FromStr for Format {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| StoreError::UnsupportedFormat(s.to_string()))
    }
}

impl TryFrom<String> for Format {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
