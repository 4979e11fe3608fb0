use serde::{Deserialize, Serialize};

use crate::shared::{
    ChunkConfig, DelimitedSourceConfig, InsertSinkConfig, ValidationError,
};

/// Configuration for a single chunk-oriented step.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StepConfig {
    /// Name of the step, recorded on its execution metadata.
    pub name: String,
    /// Chunk sizing and concurrency settings.
    #[serde(default)]
    pub chunk: ChunkConfig,
    /// Record source the step reads from.
    pub source: DelimitedSourceConfig,
    /// Record sink the step writes to.
    pub sink: InsertSinkConfig,
}

impl StepConfig {
    /// Validates step configuration settings.
    ///
    /// Besides validating each section, checks that the source field list and
    /// the sink column list line up one-to-one, since records flow positionally
    /// from one into the other.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        self.chunk.validate()?;
        self.source.validate()?;
        self.sink.validate()?;

        if self.sink.columns.len() != self.source.field_names.len() {
            return Err(ValidationError::ColumnFieldCountMismatch {
                columns: self.sink.columns.len(),
                fields: self.source.field_names.len(),
            });
        }

        Ok(())
    }
}

/// Configuration for a batch job composed of ordered steps.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobConfig {
    /// Name of the job, part of the run identity.
    pub name: String,
    /// Steps executed in declared order.
    pub steps: Vec<StepConfig>,
}

impl JobConfig {
    /// Validates job configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        if self.steps.is_empty() {
            return Err(ValidationError::NoSteps);
        }

        for step in &self.steps {
            step.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_json(columns: &str) -> String {
        format!(
            r#"{{
                "name": "person-data-step",
                "source": {{
                    "path": "data/person.csv",
                    "field_names": ["first_name", "last_name"]
                }},
                "sink": {{
                    "table": "person",
                    "columns": {columns}
                }}
            }}"#
        )
    }

    #[test]
    fn step_config_applies_chunk_defaults() {
        let step: StepConfig =
            serde_json::from_str(&step_json(r#"["first_name", "last_name"]"#)).unwrap();

        assert_eq!(step.chunk.chunk_size, ChunkConfig::DEFAULT_CHUNK_SIZE);
        assert_eq!(
            step.chunk.max_in_flight_chunks,
            ChunkConfig::DEFAULT_MAX_IN_FLIGHT_CHUNKS
        );
        assert_eq!(step.source.delimiter, DelimitedSourceConfig::DEFAULT_DELIMITER);
        step.validate().unwrap();
    }

    #[test]
    fn mismatched_columns_and_fields_fail_validation() {
        let step: StepConfig = serde_json::from_str(&step_json(r#"["first_name"]"#)).unwrap();

        let err = step.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ColumnFieldCountMismatch {
                columns: 1,
                fields: 2
            }
        ));
    }

    #[test]
    fn job_without_steps_fails_validation() {
        let job = JobConfig {
            name: "person-data-job".to_string(),
            steps: Vec::new(),
        };

        assert!(matches!(job.validate(), Err(ValidationError::NoSteps)));
    }
}
