//! Append-only event log codec.
//!
//! Each line is one `<identifier>,<start|stop>,<RFC 3339 timestamp>` CSV
//! record. Replaying the records in file order rebuilds the task collection,
//! so the order of the log is significant and rewrites must preserve it.

use std::fmt;
use std::io::{BufRead, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tl_core::TaskCollection;

use super::Codec;
use crate::StoreError;

/// What a log record does to its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Codec for the comma-separated start/stop event log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCodec;

impl LogCodec {
    /// Writes a single record without touching the rest of the log.
    pub fn write_record(
        &self,
        writer: &mut dyn Write,
        identifier: &str,
        action: Action,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut records = csv_writer(writer);
        write_one(&mut records, identifier, action, at)?;
        records.flush()?;
        Ok(())
    }
}

impl Codec for LogCodec {
    fn decode(&self, reader: &mut dyn BufRead) -> Result<TaskCollection, StoreError> {
        let mut records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut record = StringRecord::new();
        let mut tasks = TaskCollection::new();

        while records.read_record(&mut record)? {
            let line = line_of(record.position());
            let fields: Vec<&str> = record.iter().collect();
            let [identifier, action, timestamp] = fields.as_slice() else {
                return Err(StoreError::MalformedRecord {
                    line,
                    fields: fields.len(),
                });
            };

            let at = DateTime::parse_from_rfc3339(timestamp)
                .map_err(|source| StoreError::MalformedTimestamp {
                    line,
                    value: (*timestamp).to_string(),
                    source,
                })?
                .with_timezone(&Utc);

            let Some(action) = Action::parse(action) else {
                tracing::warn!(line, %action, "skipping record with unknown action");
                continue;
            };

            let task = tasks.get_or_insert(identifier);
            let changed = match action {
                Action::Start => task.start(at),
                Action::Stop => task.pause(at),
            };
            if !changed {
                tracing::trace!(line, %identifier, %action, "record changes nothing");
            }
        }

        Ok(tasks)
    }

    fn encode(&self, tasks: &TaskCollection, writer: &mut dyn Write) -> Result<(), StoreError> {
        let mut records = csv_writer(writer);
        for task in tasks {
            for activity in &task.activities {
                write_one(&mut records, &task.identifier, Action::Start, activity.start)?;
                if let Some(end) = activity.end {
                    write_one(&mut records, &task.identifier, Action::Stop, end)?;
                }
            }
        }
        records.flush()?;
        Ok(())
    }
}

/// 1-based line a CSV record or error starts on.
pub(crate) fn line_of(position: Option<&csv::Position>) -> usize {
    position.map_or(0, |p| usize::try_from(p.line()).unwrap_or(usize::MAX))
}

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    WriterBuilder::new().has_headers(false).from_writer(writer)
}

/// Timestamps keep sub-second precision when the instant has any.
fn write_one<W: Write>(
    records: &mut csv::Writer<W>,
    identifier: &str,
    action: Action,
    at: DateTime<Utc>,
) -> csv::Result<()> {
    let timestamp = at.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    records.write_record([identifier, action.as_str(), timestamp.as_str()])
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use insta::assert_snapshot;
    use tl_core::{Activity, Task};

    use super::*;

    const LOG: &str = "\
first-task,start,2019-01-01T10:00:00Z
first-task,stop,2019-01-01T10:01:00Z
second-task,start,2019-01-01T10:00:00Z
second-task,stop,2019-01-01T10:04:00Z
first-task,start,2019-01-01T10:02:00Z
first-task,stop,2019-01-01T10:06:00Z
last-task,start,2019-01-01T10:00:00Z
";

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn decode(input: &str) -> Result<TaskCollection, StoreError> {
        LogCodec.decode(&mut input.as_bytes())
    }

    fn encode(tasks: &TaskCollection) -> String {
        let mut out = Vec::new();
        LogCodec.encode(tasks, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn decode_rebuilds_tasks_in_first_seen_order() {
        let tasks = decode(LOG).unwrap();

        let ids: Vec<_> = tasks.iter().map(|t| t.identifier.as_str()).collect();
        assert_eq!(ids, ["first-task", "second-task", "last-task"]);

        let first = tasks.get("first-task").unwrap();
        assert!(!first.is_running());
        assert_eq!(first.duration(), TimeDelta::minutes(5));

        let second = tasks.get("second-task").unwrap();
        assert!(!second.is_running());
        assert_eq!(second.duration(), TimeDelta::minutes(4));

        let last = tasks.get("last-task").unwrap();
        assert!(last.is_running());
        let now = at("2019-01-01T12:00:00Z");
        assert_eq!(last.duration_at(now), TimeDelta::hours(2));
    }

    #[test]
    fn repeated_start_is_merged_into_running_activity() {
        let tasks = decode(
            "t,start,2019-01-01T10:00:00Z\n\
             t,start,2019-01-01T10:05:00Z\n",
        )
        .unwrap();

        let task = tasks.get("t").unwrap();
        assert_eq!(
            task.activities,
            vec![Activity::running(at("2019-01-01T10:00:00Z"))]
        );
    }

    #[test]
    fn stop_without_running_activity_is_ignored() {
        let tasks = decode(
            "t,stop,2019-01-01T09:00:00Z\n\
             t,start,2019-01-01T10:00:00Z\n\
             t,stop,2019-01-01T10:05:00Z\n\
             t,stop,2019-01-01T10:09:00Z\n",
        )
        .unwrap();

        assert_eq!(
            tasks.get("t").unwrap().activities,
            vec![Activity::closed(
                at("2019-01-01T10:00:00Z"),
                at("2019-01-01T10:05:00Z")
            )]
        );
    }

    #[test]
    fn lone_stop_still_creates_the_task() {
        let tasks = decode("t,stop,2019-01-01T09:00:00Z\n").unwrap();
        let task = tasks.get("t").unwrap();
        assert!(task.activities.is_empty());
    }

    #[test]
    fn record_with_two_fields_is_rejected_with_its_line() {
        let err = decode(
            "t,start,2019-01-01T10:00:00Z\n\
             t,stop\n",
        )
        .unwrap_err();

        assert!(
            matches!(err, StoreError::MalformedRecord { line: 2, fields: 2 }),
            "{err:?}"
        );
        assert_eq!(
            err.to_string(),
            "malformed record on line 2: expected 3 fields, found 2"
        );
    }

    #[test]
    fn record_with_four_fields_is_rejected() {
        let err = decode("t,start,2019-01-01T10:00:00Z,extra\n").unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { line: 1, fields: 4 }));
    }

    #[test]
    fn unparseable_timestamp_is_rejected() {
        let err = decode("t,start,yesterday\n").unwrap_err();
        match err {
            StoreError::MalformedTimestamp { line, value, .. } => {
                assert_eq!(line, 1);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_lines_and_carriage_returns_are_tolerated() {
        let tasks = decode(
            "t,start,2019-01-01T10:00:00Z\r\n\
             \r\n\
             t,stop,2019-01-01T10:01:00Z\r\n",
        )
        .unwrap();
        assert_eq!(
            tasks.get("t").unwrap().duration(),
            TimeDelta::minutes(1)
        );
    }

    #[test]
    fn unknown_action_is_skipped() {
        let tasks = decode(
            "t,start,2019-01-01T10:00:00Z\n\
             t,resume,2019-01-01T10:01:00Z\n",
        )
        .unwrap();
        assert!(tasks.get("t").unwrap().is_running());
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        let tasks = decode("t,start,2019-01-01T11:00:00+01:00\n").unwrap();
        assert_eq!(
            tasks.get("t").unwrap().activities[0].start,
            at("2019-01-01T10:00:00Z")
        );
    }

    #[test]
    fn encode_writes_start_then_stop_per_activity() {
        let tasks: TaskCollection = [
            Task::with_activities(
                "first-task",
                vec![Activity::running(at("2010-06-01T15:00:00Z"))],
            ),
            Task::with_activities(
                "second-task",
                vec![Activity::closed(
                    at("2019-01-01T10:00:00Z"),
                    at("2019-01-01T10:04:00Z"),
                )],
            ),
            Task::with_activities(
                "last-task",
                vec![Activity::running(at("2019-01-01T10:00:00Z"))],
            ),
        ]
        .into_iter()
        .collect();

        assert_snapshot!(encode(&tasks), @r"
        first-task,start,2010-06-01T15:00:00Z
        second-task,start,2019-01-01T10:00:00Z
        second-task,stop,2019-01-01T10:04:00Z
        last-task,start,2019-01-01T10:00:00Z
        ");
    }

    #[test]
    fn encode_of_empty_collection_is_empty() {
        assert_eq!(encode(&TaskCollection::new()), "");
    }

    #[test]
    fn decode_then_encode_reproduces_the_log() {
        // The fixture interleaves tasks, so the re-encoded log is grouped by task.
        let tasks = decode(LOG).unwrap();
        let reencoded = encode(&tasks);
        assert_eq!(decode(&reencoded).unwrap(), tasks);
    }

    #[test]
    fn encode_then_decode_round_trips() {
        let tasks: TaskCollection = [
            Task::with_activities(
                "a",
                vec![
                    Activity::closed(at("2020-02-01T08:00:00Z"), at("2020-02-01T09:30:00Z")),
                    Activity::running(at("2020-02-01T10:00:00Z")),
                ],
            ),
            Task::new("never-started"),
            Task::with_activities(
                "b",
                vec![Activity::closed(
                    at("2020-02-01T07:00:00Z"),
                    at("2020-02-01T07:00:00Z"),
                )],
            ),
        ]
        .into_iter()
        .collect();

        let decoded = decode(&encode(&tasks)).unwrap();

        // A task without activities leaves no record behind.
        let expected: TaskCollection = tasks
            .into_iter()
            .filter(|t| !t.activities.is_empty())
            .collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn identifiers_with_separators_are_quoted() {
        let tasks: TaskCollection = [Task::with_activities(
            "meeting, \"weekly\"",
            vec![Activity::running(at("2020-01-01T00:00:00Z"))],
        )]
        .into_iter()
        .collect();

        let encoded = encode(&tasks);
        assert_eq!(
            encoded,
            "\"meeting, \"\"weekly\"\"\",start,2020-01-01T00:00:00Z\n"
        );
        assert_eq!(decode(&encoded).unwrap(), tasks);
    }

    #[test]
    fn sub_second_timestamps_survive_a_round_trip() {
        let tasks = TaskCollection::from_iter([Task::with_activities(
            "t",
            vec![
                Activity::closed(at("2019-01-01T10:00:00.250Z"), at("2019-01-01T10:00:05.750Z")),
                Activity::running(at("2019-01-01T11:00:00.123456789Z")),
            ],
        )]);

        let encoded = encode(&tasks);
        assert_snapshot!(encoded, @r"
        t,start,2019-01-01T10:00:00.250Z
        t,stop,2019-01-01T10:00:05.750Z
        t,start,2019-01-01T11:00:00.123456789Z
        ");
        assert_eq!(decode(&encoded).unwrap(), tasks);
    }

    #[test]
    fn identifiers_with_line_breaks_stay_in_one_record() {
        let tasks = TaskCollection::from_iter([Task::with_activities(
            "two\nlines",
            vec![Activity::running(at("2020-01-01T00:00:00Z"))],
        )]);

        let encoded = encode(&tasks);
        assert_eq!(encoded, "\"two\nlines\",start,2020-01-01T00:00:00Z\n");
        assert_eq!(decode(&encoded).unwrap(), tasks);
    }

    #[test]
    fn invalid_utf8_is_reported_as_a_malformed_log() {
        let err = LogCodec
            .decode(&mut &b"t,start,2019-01-01T10:00:00Z\n\xff,stop,2019-01-01T10:01:00Z\n"[..])
            .unwrap_err();
        assert!(matches!(err, StoreError::MalformedLog { .. }), "{err:?}");
    }

    #[test]
    fn write_record_appends_a_single_line() {
        let mut out = Vec::new();
        LogCodec
            .write_record(&mut out, "t", Action::Stop, at("2019-01-01T10:00:00Z"))
            .unwrap();
        assert_eq!(out, b"t,stop,2019-01-01T10:00:00Z\n");
    }
}
