use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single typed field value within a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Absent value.
    Null,
    /// Text value.
    String(String),
    /// 64-bit signed integer value.
    I64(i64),
    /// 64-bit floating point value.
    F64(f64),
    /// Timestamp value in UTC.
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("null"),
            Cell::String(value) => f.write_str(value),
            Cell::I64(value) => write!(f, "{value}"),
            Cell::F64(value) => write!(f, "{value}"),
            Cell::Timestamp(value) => write!(f, "{value}"),
        }
    }
}

/// One record flowing from a source to a sink.
///
/// Values are positional; the mapping to field names is defined by the source
/// configuration and the mapping to columns by the sink configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Ordered field values of this record.
    pub values: Vec<Cell>,
}

impl Record {
    /// Creates a record from ordered field values.
    pub fn new(values: Vec<Cell>) -> Self {
        Self { values }
    }
}
