//! Calendar document codec.
//!
//! Every activity becomes one `VEVENT` whose `SUMMARY` is the task
//! identifier. Events are never merged on decode, so overlapping events for
//! the same task yield several running activities; that looseness is kept.

use std::io::{BufRead, Write};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tl_core::{Activity, TaskCollection};

use super::Codec;
use crate::StoreError;

/// Product identifier written to the `PRODID` header.
pub const PRODUCT_ID: &str = "tasklog/tl";

const UTC_DATE_TIME: &str = "%Y%m%dT%H%M%SZ";
const FLOATING_DATE_TIME: &str = "%Y%m%dT%H%M%S";
const DATE: &str = "%Y%m%d";

/// Codec for calendar documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCodec {
    /// Value written to the header `SUMMARY` line.
    pub version: String,
    /// Value written to the `CALSCALE` line.
    pub scale: String,
}

impl Default for CalendarCodec {
    fn default() -> Self {
        Self {
            version: "2.0".to_string(),
            scale: "GREGORIAN".to_string(),
        }
    }
}

impl CalendarCodec {
    pub fn new(version: impl Into<String>, scale: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            scale: scale.into(),
        }
    }
}

impl Codec for CalendarCodec {
    fn decode(&self, reader: &mut dyn BufRead) -> Result<TaskCollection, StoreError> {
        let lines = unfold(reader)?;
        let is_calendar = lines.first().is_some_and(|l| {
            parse_property(l)
                .is_ok_and(|p| p.name == "BEGIN" && p.value.eq_ignore_ascii_case("VCALENDAR"))
        });
        if !is_calendar {
            tracing::debug!("no calendar found, treating store as empty");
            return Ok(TaskCollection::new());
        }

        let mut tasks = TaskCollection::new();
        let mut open: Vec<String> = Vec::new();
        let mut event: Option<EventFields> = None;
        let mut closed = false;

        for raw in &lines {
            let property = parse_property(raw)?;
            match property.name.as_str() {
                "BEGIN" => {
                    let component = property.value.to_ascii_uppercase();
                    if component == "VEVENT" {
                        if event.is_some() {
                            return Err(malformed(raw.line, "nested VEVENT"));
                        }
                        event = Some(EventFields::default());
                    }
                    open.push(component);
                }
                "END" => {
                    let component = property.value.to_ascii_uppercase();
                    match open.pop() {
                        Some(current) if current == component => {}
                        Some(current) => {
                            return Err(malformed(
                                raw.line,
                                &format!("END:{component} does not close {current}"),
                            ));
                        }
                        None => {
                            return Err(malformed(raw.line, &format!("unexpected END:{component}")));
                        }
                    }
                    if component == "VEVENT" {
                        if let Some(fields) = event.take() {
                            fields.finish(&mut tasks)?;
                        }
                    } else if component == "VCALENDAR" && open.is_empty() {
                        closed = true;
                        break;
                    }
                }
                name => {
                    let in_event = open.last().is_some_and(|c| c == "VEVENT");
                    if let (true, Some(fields)) = (in_event, event.as_mut()) {
                        fields.record(name, property.value, raw.line);
                    }
                }
            }
        }

        if !closed {
            let line = lines.last().map_or(0, |l| l.line);
            return Err(malformed(line, "calendar ended before END:VCALENDAR"));
        }

        Ok(tasks)
    }

    fn encode(&self, tasks: &TaskCollection, writer: &mut dyn Write) -> Result<(), StoreError> {
        write!(
            writer,
            "BEGIN:VCALENDAR\nSUMMARY:{}\nPRODID:-//{PRODUCT_ID}\nCALSCALE:{}\n",
            self.version, self.scale
        )?;

        for task in tasks {
            for activity in &task.activities {
                write!(
                    writer,
                    "BEGIN:VEVENT\nSUMMARY:{}\nDTSTART:{}\n",
                    task.identifier,
                    activity.start.format(UTC_DATE_TIME)
                )?;
                if let Some(end) = activity.end {
                    writeln!(writer, "DTEND:{}", end.format(UTC_DATE_TIME))?;
                }
                writer.write_all(b"END:VEVENT\n")?;
            }
        }

        writer.write_all(b"END:VCALENDAR")?;
        writer.flush()?;
        Ok(())
    }
}

/// One logical content line after unfolding.
struct RawLine {
    line: usize,
    text: String,
}

struct Property<'a> {
    name: String,
    value: &'a str,
}

/// A value together with the line it came from.
struct Located {
    line: usize,
    value: String,
}

#[derive(Default)]
struct EventFields {
    summary: Option<Located>,
    start: Option<Located>,
    end: Option<Located>,
}

impl EventFields {
    fn record(&mut self, name: &str, value: &str, line: usize) {
        let slot = match name {
            "SUMMARY" => &mut self.summary,
            "DTSTART" => &mut self.start,
            "DTEND" => &mut self.end,
            _ => return,
        };
        *slot = Some(Located {
            line,
            value: value.to_string(),
        });
    }

    fn finish(self, tasks: &mut TaskCollection) -> Result<(), StoreError> {
        let (Some(summary), Some(start)) = (self.summary, self.start) else {
            tracing::debug!("skipping event without SUMMARY or DTSTART");
            return Ok(());
        };

        let start = parse_date(&start)?;
        let end = self.end.as_ref().map(parse_date).transpose()?;

        tasks
            .get_or_insert(&summary.value)
            .activities
            .push(Activity { start, end });
        Ok(())
    }
}

/// Reads every line, joining folded continuation lines onto their parent.
fn unfold(reader: &mut dyn BufRead) -> Result<Vec<RawLine>, StoreError> {
    let mut lines: Vec<RawLine> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');

        if let Some(continuation) = line.strip_prefix([' ', '\t']) {
            if let Some(previous) = lines.last_mut() {
                previous.text.push_str(continuation);
                continue;
            }
        }
        if line.trim().is_empty() {
            continue;
        }
        lines.push(RawLine {
            line: index + 1,
            text: line.to_string(),
        });
    }

    Ok(lines)
}

/// Splits `NAME;PARAM=...:VALUE`, discarding parameters.
fn parse_property(raw: &RawLine) -> Result<Property<'_>, StoreError> {
    let Some((head, value)) = raw.text.split_once(':') else {
        return Err(malformed(raw.line, "expected NAME:VALUE"));
    };
    let name = head.split(';').next().unwrap_or(head);
    Ok(Property {
        name: name.trim().to_ascii_uppercase(),
        value,
    })
}

fn parse_date(located: &Located) -> Result<DateTime<Utc>, StoreError> {
    let value = located.value.trim();
    let parsed = if value.ends_with('Z') {
        NaiveDateTime::parse_from_str(value, UTC_DATE_TIME)
    } else if value.contains('T') {
        NaiveDateTime::parse_from_str(value, FLOATING_DATE_TIME)
    } else {
        NaiveDate::parse_from_str(value, DATE).map(|d| d.and_time(NaiveTime::default()))
    };

    parsed
        .map(|naive| naive.and_utc())
        .map_err(|source| StoreError::MalformedTimestamp {
            line: located.line,
            value: value.to_string(),
            source,
        })
}

fn malformed(line: usize, message: &str) -> StoreError {
    StoreError::MalformedCalendar {
        line,
        message: message.to_string(),
    }
}
