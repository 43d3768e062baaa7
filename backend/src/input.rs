//! Process input parsing
//!
//! Turns input text into validated [`Process`] records before any simulation
//! starts. Two formats are accepted.
//!
//! **Text**, one process per line, comma separated:
//!
//! ```text
//! # PID, memory_size, arrival_time, processing_time, io_frequency, io_duration
//! 10, 8, 0, 50, 10, 5
//! 11, 2, 4, 20, 0, 0
//! # the memory_size column may be omitted
//! 12, 6, 30, 15, 3
//! ```
//!
//! **JSON**, an array of objects with the same field names
//! (`memory_size`, `io_frequency` and `io_duration` default to 0).
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::models::process::{Pid, Process};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while reading process input
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("line {line}: expected 5 or 6 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: field '{field}' is empty")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: field '{field}' is not a non-negative integer: '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: process {pid} has zero processing_time")]
    ZeroProcessingTime { line: usize, pid: Pid },

    #[error("duplicate PID {pid} on lines {first} and {second}")]
    DuplicatePid { pid: Pid, first: usize, second: usize },

    #[error("invalid JSON input: {0}")]
    Json(String),
}

/// One input record, as written in the input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub pid: Pid,
    #[serde(default)]
    pub memory_size: u32,
    pub arrival_time: usize,
    pub processing_time: usize,
    #[serde(default)]
    pub io_frequency: usize,
    #[serde(default)]
    pub io_duration: usize,
}

impl ProcessSpec {
    /// Build the process record; `line` is only used for error reporting
    fn into_process(self, line: usize) -> Result<Process, InputError> {
        if self.processing_time == 0 {
            return Err(InputError::ZeroProcessingTime {
                line,
                pid: self.pid,
            });
        }

        Ok(Process::new(self.pid, self.arrival_time, self.processing_time)
            .with_io(self.io_frequency, self.io_duration)
            .with_memory_size(self.memory_size))
    }
}

impl From<&Process> for ProcessSpec {
    fn from(process: &Process) -> Self {
        ProcessSpec {
            pid: process.pid(),
            memory_size: process.memory_size(),
            arrival_time: process.arrival_time(),
            processing_time: process.processing_time(),
            io_frequency: process.io_frequency(),
            io_duration: process.io_duration(),
        }
    }
}

const FULL_FIELDS: [&str; 6] = [
    "pid",
    "memory_size",
    "arrival_time",
    "processing_time",
    "io_frequency",
    "io_duration",
];

const SHORT_FIELDS: [&str; 5] = [
    "pid",
    "arrival_time",
    "processing_time",
    "io_frequency",
    "io_duration",
];

fn parse_field<T: std::str::FromStr>(
    line: usize,
    field: &'static str,
    raw: &str,
) -> Result<T, InputError> {
    if raw.is_empty() {
        return Err(InputError::MissingField { line, field });
    }
    raw.parse().map_err(|_| InputError::InvalidNumber {
        line,
        field,
        value: raw.to_string(),
    })
}

/// Parse one line (1-based `line` number for errors)
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Example
///
/// ```rust
/// use cpu_scheduler_core_rs::input::parse_line;
///
/// let p = parse_line(1, "4, 10, 3, 25, 5, 2").unwrap().unwrap();
/// assert_eq!(p.pid(), 4);
/// assert_eq!(p.memory_size(), 10);
/// assert_eq!(p.io_frequency(), 5);
///
/// assert!(parse_line(2, "   ").unwrap().is_none());
/// assert!(parse_line(3, "4, x, 3, 25, 5, 2").is_err());
/// ```
pub fn parse_line(line: usize, text: &str) -> Result<Option<Process>, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let raw: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    let names: &[&'static str] = match raw.len() {
        6 => &FULL_FIELDS,
        5 => &SHORT_FIELDS,
        found => return Err(InputError::FieldCount { line, found }),
    };

    let mut fields: HashMap<&'static str, &str> = names.iter().copied().zip(raw).collect();
    let mut take = |name: &'static str| fields.remove(name).unwrap_or("0");

    let spec = ProcessSpec {
        pid: parse_field(line, "pid", take("pid"))?,
        memory_size: parse_field(line, "memory_size", take("memory_size"))?,
        arrival_time: parse_field(line, "arrival_time", take("arrival_time"))?,
        processing_time: parse_field(line, "processing_time", take("processing_time"))?,
        io_frequency: parse_field(line, "io_frequency", take("io_frequency"))?,
        io_duration: parse_field(line, "io_duration", take("io_duration"))?,
    };

    spec.into_process(line).map(Some)
}

/// Reject PIDs that appear twice; `lines[i]` is the source line of `processes[i]`
fn check_unique(processes: &[Process], lines: &[usize]) -> Result<(), InputError> {
    let mut first_seen: HashMap<Pid, usize> = HashMap::new();
    for (process, &line) in processes.iter().zip(lines) {
        if let Some(&first) = first_seen.get(&process.pid()) {
            return Err(InputError::DuplicatePid {
                pid: process.pid(),
                first,
                second: line,
            });
        }
        first_seen.insert(process.pid(), line);
    }
    Ok(())
}

/// Parse the text format
///
/// Processes keep input order, which is also the order admission is
/// attempted in.
pub fn parse_processes(text: &str) -> Result<Vec<Process>, InputError> {
    let mut processes = Vec::new();
    let mut lines = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        if let Some(process) = parse_line(i + 1, raw)? {
            processes.push(process);
            lines.push(i + 1);
        }
    }

    check_unique(&processes, &lines)?;
    Ok(processes)
}

/// Parse the JSON format; "line" numbers in errors are 1-based array indices
pub fn parse_processes_json(text: &str) -> Result<Vec<Process>, InputError> {
    let specs: Vec<ProcessSpec> =
        serde_json::from_str(text).map_err(|e| InputError::Json(e.to_string()))?;

    let processes = specs
        .into_iter()
        .enumerate()
        .map(|(i, spec)| spec.into_process(i + 1))
        .collect::<Result<Vec<_>, _>>()?;
    let lines: Vec<usize> = (1..=processes.len()).collect();

    check_unique(&processes, &lines)?;
    Ok(processes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_form_defaults_memory_size() {
        let p = parse_line(1, "3,0,12,4,1").unwrap().unwrap();
        assert_eq!(p.memory_size(), 0);
        assert_eq!(p.processing_time(), 12);
        assert_eq!(p.io_duration(), 1);
    }

    #[test]
    fn test_empty_field_is_missing() {
        assert_eq!(
            parse_line(7, "3, 1, , 4, 0, 0").unwrap_err(),
            InputError::MissingField {
                line: 7,
                field: "arrival_time"
            }
        );
    }

    #[test]
    fn test_negative_number_rejected() {
        assert_eq!(
            parse_line(2, "3, 1, -4, 4, 0, 0").unwrap_err(),
            InputError::InvalidNumber {
                line: 2,
                field: "arrival_time",
                value: "-4".to_string()
            }
        );
    }
}
