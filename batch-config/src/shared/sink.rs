use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Configuration for the relational insert sink.
///
/// The sink issues a fixed insert statement binding the configured columns in
/// order, one placeholder per column.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InsertSinkConfig {
    /// Name of the destination table.
    pub table: String,
    /// Ordered column names bound by the insert statement.
    pub columns: Vec<String>,
}

impl InsertSinkConfig {
    /// Validates sink configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.columns.is_empty() {
            return Err(ValidationError::EmptyColumns);
        }

        Ok(())
    }
}
