//! Named tasks and their tracked activities.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::Activity;

/// A named unit of work tracked over time.
///
/// Activities are kept in discovery order, which is usually but not
/// necessarily chronological.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Case-sensitive identity of the task.
    pub identifier: String,
    /// Intervals during which the task ran.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Task {
    /// Creates a task with no recorded activity.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            activities: Vec::new(),
        }
    }

    /// Creates a task from existing activities.
    pub fn with_activities(identifier: impl Into<String>, activities: Vec<Activity>) -> Self {
        Self {
            identifier: identifier.into(),
            activities,
        }
    }

    /// The most recently added activity that has not ended.
    pub fn running_activity(&self) -> Option<&Activity> {
        self.activities.iter().rev().find(|a| a.is_running())
    }

    /// Whether any activity of the task is still open.
    pub fn is_running(&self) -> bool {
        self.running_activity().is_some()
    }

    /// Total tracked time, with running activities ending at `now`.
    pub fn duration_at(&self, now: DateTime<Utc>) -> TimeDelta {
        self.activities
            .iter()
            .map(|a| a.duration_at(now))
            .fold(TimeDelta::zero(), |total, span| total + span)
    }

    /// Total tracked time measured against the wall clock.
    pub fn duration(&self) -> TimeDelta {
        self.duration_at(Utc::now())
    }

    /// Opens a new activity at `at` unless one is already running.
    ///
    /// Returns `true` if the task changed.
    pub fn start(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_running() {
            return false;
        }
        self.activities.push(Activity::running(at));
        true
    }

    /// Closes every open activity at `at`, so the task is idle afterwards.
    ///
    /// Overlapping calendar events can leave several activities open at once.
    /// Returns `true` if the task changed.
    pub fn pause(&mut self, at: DateTime<Utc>) -> bool {
        let mut changed = false;
        for activity in self.activities.iter_mut().filter(|a| a.is_running()) {
            activity.end = Some(at);
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn finished_task() -> Task {
        Task::with_activities(
            "identifier-1",
            vec![
                Activity::closed(at("2017-01-01T19:06:02Z"), at("2017-01-01T19:06:03Z")),
                Activity::closed(at("2016-01-02T15:04:00Z"), at("2016-01-02T15:04:02Z")),
            ],
        )
    }

    #[test]
    fn task_with_open_activity_is_running() {
        let task = Task::with_activities(
            "identifier-1",
            vec![
                Activity::closed(at("2017-01-01T19:06:02Z"), at("2017-01-01T19:06:03Z")),
                Activity::running(at("2016-01-02T15:04:00Z")),
            ],
        );

        assert!(task.is_running());
        assert_eq!(
            task.running_activity(),
            Some(&Activity::running(at("2016-01-02T15:04:00Z")))
        );
    }

    #[test]
    fn task_with_only_closed_activities_is_not_running() {
        let task = finished_task();
        assert!(!task.is_running());
        assert!(task.running_activity().is_none());
    }

    #[test]
    fn new_task_is_idle_with_zero_duration() {
        let task = Task::new("fresh");
        assert!(!task.is_running());
        assert_eq!(task.duration(), TimeDelta::zero());
    }

    #[test]
    fn duration_sums_activities() {
        assert_eq!(finished_task().duration(), TimeDelta::seconds(3));
    }

    #[test]
    fn duration_measures_running_activity_to_now() {
        let mut task = finished_task();
        task.activities
            .push(Activity::running(at("2020-01-01T00:00:00Z")));

        let now = at("2020-01-01T00:10:00Z");
        assert_eq!(
            task.duration_at(now),
            TimeDelta::seconds(3) + TimeDelta::minutes(10)
        );
    }

    #[test]
    fn running_activity_prefers_the_latest_open_one() {
        let task = Task::with_activities(
            "overlap",
            vec![
                Activity::running(at("2020-01-01T00:00:00Z")),
                Activity::running(at("2020-01-01T01:00:00Z")),
            ],
        );

        assert_eq!(
            task.running_activity().map(|a| a.start),
            Some(at("2020-01-01T01:00:00Z"))
        );
    }

    #[test]
    fn start_is_idempotent() {
        let mut task = Task::new("t");
        assert!(task.start(at("2020-01-01T00:00:00Z")));
        assert!(!task.start(at("2020-01-01T00:05:00Z")));

        assert_eq!(
            task.activities,
            vec![Activity::running(at("2020-01-01T00:00:00Z"))]
        );
    }

    #[test]
    fn pause_is_idempotent() {
        let mut task = Task::new("t");
        task.start(at("2020-01-01T00:00:00Z"));

        assert!(task.pause(at("2020-01-01T00:05:00Z")));
        let after_first = task.clone();
        assert!(!task.pause(at("2020-01-01T00:09:00Z")));

        assert_eq!(task, after_first);
        assert_eq!(
            task.activities,
            vec![Activity::closed(
                at("2020-01-01T00:00:00Z"),
                at("2020-01-01T00:05:00Z")
            )]
        );
    }

    #[test]
    fn pause_closes_every_overlapping_activity() {
        let mut task = Task::with_activities(
            "overlap",
            vec![
                Activity::running(at("2020-01-01T00:00:00Z")),
                Activity::closed(at("2020-01-01T00:10:00Z"), at("2020-01-01T00:20:00Z")),
                Activity::running(at("2020-01-01T01:00:00Z")),
            ],
        );

        assert!(task.pause(at("2020-01-01T02:00:00Z")));
        assert!(!task.is_running());
        assert_eq!(
            task.activities,
            vec![
                Activity::closed(at("2020-01-01T00:00:00Z"), at("2020-01-01T02:00:00Z")),
                Activity::closed(at("2020-01-01T00:10:00Z"), at("2020-01-01T00:20:00Z")),
                Activity::closed(at("2020-01-01T01:00:00Z"), at("2020-01-01T02:00:00Z")),
            ]
        );
    }

    #[test]
    fn pause_without_activity_is_noop() {
        let mut task = Task::new("t");
        assert!(!task.pause(at("2020-01-01T00:00:00Z")));
        assert!(task.activities.is_empty());
    }
}
