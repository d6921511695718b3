//! Translation between persisted formats and task collections.

use std::io::{BufRead, Write};

use tl_core::TaskCollection;

use crate::StoreError;

pub mod calendar;
pub mod log;

pub use calendar::CalendarCodec;
pub use log::{Action, LogCodec};

/// A decode/encode pair for one persisted format.
pub trait Codec {
    /// Reconstructs a collection from the whole of `reader`.
    ///
    /// Any error aborts the read; no partial collection is returned.
    fn decode(&self, reader: &mut dyn BufRead) -> Result<TaskCollection, StoreError>;

    /// Writes the whole of `tasks` to `writer` and flushes it.
    fn encode(&self, tasks: &TaskCollection, writer: &mut dyn Write) -> Result<(), StoreError>;
}
