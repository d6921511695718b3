//! Shell completion candidates.
//!
//! Completion runs inside the `tl` binary (`COMPLETE=bash tl` prints the
//! registration script), so candidates come from the configured store.

use clap_complete::engine::CompletionCandidate;
use tl_store::Format;

use crate::Config;

/// Identifiers of stored tasks; nothing when the store cannot be read.
pub fn task_candidates() -> Vec<CompletionCandidate> {
    Config::load_from(None)
        .map_or_else(|_| Vec::new(), |config| stored_identifiers(&config))
        .into_iter()
        .map(CompletionCandidate::new)
        .collect()
}

/// Every export format token.
pub fn format_candidates() -> Vec<CompletionCandidate> {
    Format::ALL
        .iter()
        .map(|format| CompletionCandidate::new(format.as_str()))
        .collect()
}

pub fn stored_identifiers(config: &Config) -> Vec<String> {
    let mut repository = config
        .store_format
        .open_file(&config.store_path, &config.calendar());
    match repository.get_tasks() {
        Ok(tasks) => tasks.into_iter().map(|task| task.identifier).collect(),
        Err(err) => {
            tracing::debug!(%err, "no task completions");
            Vec::new()
        }
    }
}
