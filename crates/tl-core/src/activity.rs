//! Contiguous intervals of work on a task.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// One contiguous interval during which a task was running.
///
/// An activity without an `end` is still running; its span is measured
/// against "now" at query time. `end` is expected to be no earlier than
/// `start`, but a reversed interval only yields a negative span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// When the interval began.
    pub start: DateTime<Utc>,
    /// When the interval ended, if it has.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl Activity {
    /// Creates an activity that is still running.
    pub const fn running(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    /// Creates a finished activity.
    pub const fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Whether the interval is still open.
    pub const fn is_running(&self) -> bool {
        self.end.is_none()
    }

    /// Span of the interval, with a running activity ending at `now`.
    pub fn duration_at(&self, now: DateTime<Utc>) -> TimeDelta {
        self.end.unwrap_or(now) - self.start
    }

    /// Span of the interval measured against the wall clock.
    pub fn duration(&self) -> TimeDelta {
        self.duration_at(Utc::now())
    }
}
