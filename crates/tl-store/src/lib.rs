//! Persistence for the task log.
//!
//! Tasks live in one of two text formats:
//!
//! - an append-only event log of `identifier,action,timestamp` records;
//! - a calendar document with one `VEVENT` per activity.
//!
//! A [`codec`] translates between a format and a [`TaskCollection`], a
//! [`store`] supplies the bytes, and a [`repository`] binds the two. The
//! [`TaskService`] implements start/pause/switch/delete/export on top of any
//! repository.
//!
//! # Concurrency
//!
//! Everything here is synchronous and single-threaded. Backing files are not
//! locked; two processes appending to the same log at once may interleave.
//!
//! [`TaskCollection`]: tl_core::TaskCollection

pub mod codec;
mod error;
mod format;
pub mod repository;
mod service;
pub mod store;

pub use codec::{CalendarCodec, Codec, LogCodec};
pub use error::StoreError;
pub use format::Format;
pub use repository::{
    CalendarRepository, Deleter, LogRepository, MemoryRepository, StarterPauser, TaskRepository,
};
pub use service::TaskService;
pub use store::{BufferStore, FileStore, Store, StreamStore};
