use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Configuration for a delimited flat-file record source.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DelimitedSourceConfig {
    /// Path of the file to read.
    pub path: PathBuf,
    /// Delimiter separating fields within a line.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Ordered field names defining the column-to-field mapping.
    pub field_names: Vec<String>,
}

impl DelimitedSourceConfig {
    /// Default field delimiter.
    pub const DEFAULT_DELIMITER: char = ',';

    /// Validates source configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.field_names.is_empty() {
            return Err(ValidationError::EmptyFieldNames);
        }

        Ok(())
    }
}

fn default_delimiter() -> char {
    DelimitedSourceConfig::DEFAULT_DELIMITER
}
