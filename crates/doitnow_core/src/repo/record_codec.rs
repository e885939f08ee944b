//! Semicolon-delimited record codec.
//!
//! # Responsibility
//! - Encode/decode `username;password` user lines.
//! - Encode/decode `username;title;description;due;assigned;Yes|No` task lines.
//!
//! # Invariants
//! - Dates are written as `YYYY-MM-DD`.
//! - Any completion token other than `Yes` decodes as incomplete.
//! - Blank lines are skipped; a trailing `\r` is ignored.
//! - The delimiter is not escaped; free text containing `;` cannot round-trip.

use crate::model::task::{Task, DATE_FORMAT};
use crate::model::user::{normalize_username, user_exists, User};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field separator used by both stores.
pub const FIELD_DELIMITER: &str = ";";

const COMPLETED_TOKEN: &str = "Yes";
const INCOMPLETE_TOKEN: &str = "No";
const USER_FIELD_COUNT: usize = 2;
const TASK_FIELD_COUNT: usize = 6;

static RECORD_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid record date regex"));

/// Decode failure for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// 1-based line number in the source text.
    pub line: usize,
    pub message: String,
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl Error for RecordError {}

/// Encodes users, one line each.
pub fn encode_users(users: &[User]) -> String {
    users
        .iter()
        .map(|user| format!("{}{FIELD_DELIMITER}{}\n", user.username, user.password))
        .collect()
}

/// Decodes a whole user store.
///
/// Usernames are normalized on the way in; a name that appears twice after
/// normalization is a record error.
pub fn decode_users(text: &str) -> Result<Vec<User>, RecordError> {
    let mut users: Vec<User> = Vec::new();
    for (line, record) in record_lines(text) {
        let fields = split_fields(record, USER_FIELD_COUNT, line)?;
        let user = User::new(fields[0], fields[1]);
        if user_exists(&users, &user.username) {
            return Err(RecordError {
                line,
                message: format!("duplicate username `{}`", user.username),
            });
        }
        users.push(user);
    }
    Ok(users)
}

/// Encodes tasks, one line each.
pub fn encode_tasks(tasks: &[Task]) -> String {
    tasks.iter().map(encode_task).collect()
}

fn encode_task(task: &Task) -> String {
    let completed = if task.completed {
        COMPLETED_TOKEN
    } else {
        INCOMPLETE_TOKEN
    };
    let due_date = task.due_date.format(DATE_FORMAT).to_string();
    let assigned_date = task.assigned_date.format(DATE_FORMAT).to_string();
    let fields = [
        task.username.as_str(),
        task.title.as_str(),
        task.description.as_str(),
        due_date.as_str(),
        assigned_date.as_str(),
        completed,
    ];
    let mut line = fields.join(FIELD_DELIMITER);
    line.push('\n');
    line
}

/// Decodes a whole task store. Every task gets a fresh session id.
pub fn decode_tasks(text: &str) -> Result<Vec<Task>, RecordError> {
    record_lines(text)
        .map(|(line, record)| -> Result<Task, RecordError> {
            let fields = split_fields(record, TASK_FIELD_COUNT, line)?;
            let due_date = decode_date(fields[3], "due_date", line)?;
            let assigned_date = decode_date(fields[4], "assigned_date", line)?;
            Ok(Task::from_record(
                normalize_username(fields[0]),
                fields[1],
                fields[2],
                due_date,
                assigned_date,
                fields[5] == COMPLETED_TOKEN,
            ))
        })
        .collect()
}

fn record_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split('\n')
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.strip_suffix('\r').unwrap_or(line)))
        .filter(|(_, line)| !line.is_empty())
}

fn split_fields(record: &str, expected: usize, line: usize) -> Result<Vec<&str>, RecordError> {
    let fields: Vec<&str> = record.split(FIELD_DELIMITER).collect();
    if fields.len() != expected {
        return Err(RecordError {
            line,
            message: format!("expected {expected} fields, found {}", fields.len()),
        });
    }
    Ok(fields)
}

fn decode_date(value: &str, field: &str, line: usize) -> Result<NaiveDate, RecordError> {
    let invalid = || RecordError {
        line,
        message: format!("invalid {field} `{value}`, expected YYYY-MM-DD"),
    };
    if !RECORD_DATE_RE.is_match(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}
