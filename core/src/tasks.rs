//! Decoder for the GeoWebCache seeding task table.
//!
//! The task list comes back as a table of integer rows:
//!
//! ```json
//! {"long-array-array": [[3296, 6624, 124, 57, 2], [-1, -1, -2, 59, 2]]}
//! ```
//!
//! Each row is `[tiles processed, tiles total, tiles remaining, task id,
//! status]`. A row of any other width means the server speaks a layout this
//! decoder does not know, so the whole table is rejected.

use std::fmt;

use serde::Deserialize;
use tracing::warn;

use crate::codec;
use crate::error::Result;

/// Width of a task row.
pub const ROW_WIDTH: usize = 5;

const ROWS_KEY: &str = "long-array-array";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Aborted,
    Pending,
    Running,
    Done,
    /// A code outside the known set, kept as sent.
    Unknown(i64),
}

impl TaskStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            -1 => TaskStatus::Aborted,
            0 => TaskStatus::Pending,
            1 => TaskStatus::Running,
            2 => TaskStatus::Done,
            other => TaskStatus::Unknown(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            TaskStatus::Aborted => -1,
            TaskStatus::Pending => 0,
            TaskStatus::Running => 1,
            TaskStatus::Done => 2,
            TaskStatus::Unknown(code) => code,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, TaskStatus::Unknown(_))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Aborted => f.write_str("aborted"),
            TaskStatus::Pending => f.write_str("pending"),
            TaskStatus::Running => f.write_str("running"),
            TaskStatus::Done => f.write_str("done"),
            TaskStatus::Unknown(code) => write!(f, "unknown({code})"),
        }
    }
}

/// One seeding task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: i64,
    pub status: TaskStatus,
    pub tiles_processed: i64,
    pub tiles_total: i64,
    pub tiles_remaining: i64,
}

impl TaskRecord {
    fn from_row(row: &[i64]) -> Self {
        TaskRecord {
            id: row[3],
            status: TaskStatus::from_code(row[4]),
            tiles_processed: row[0],
            tiles_total: row[1],
            tiles_remaining: row[2],
        }
    }
}

#[derive(Deserialize)]
struct TaskTable {
    #[serde(rename = "long-array-array")]
    rows: Vec<Vec<i64>>,
}

/// Decode a task table body. An empty table means no active tasks.
pub fn decode_tasks(body: &[u8]) -> Result<Vec<TaskRecord>> {
    let table: TaskTable = codec::from_json(body)?;
    if let Some((index, row)) = table.rows.iter().enumerate().find(|(_, row)| row.len() != ROW_WIDTH) {
        return Err(codec::decode_error::<TaskRecord>(
            format!(
                "`{ROWS_KEY}` row {index} has {} fields, expected {ROW_WIDTH}",
                row.len()
            ),
            body,
        ));
    }

    let records: Vec<TaskRecord> = table.rows.iter().map(|row| TaskRecord::from_row(row)).collect();
    for record in records.iter().filter(|r| !r.status.is_known()) {
        warn!(
            task_id = record.id,
            code = record.status.code(),
            "seeding task reported an unrecognized status code"
        );
    }
    Ok(records)
}
