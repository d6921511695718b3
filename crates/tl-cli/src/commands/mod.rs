//! CLI subcommand implementations.

pub mod complete;
pub mod delete;
pub mod export;
pub mod list;
pub mod status;
pub mod track;
pub mod util;
