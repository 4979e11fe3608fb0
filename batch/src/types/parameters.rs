use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single typed job parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    /// Text parameter.
    String(String),
    /// 64-bit signed integer parameter.
    Long(i64),
    /// 64-bit floating point parameter.
    Double(f64),
    /// Timestamp parameter in UTC.
    Date(DateTime<Utc>),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::String(value) => f.write_str(value),
            ParameterValue::Long(value) => write!(f, "{value}"),
            ParameterValue::Double(value) => write!(f, "{value}"),
            ParameterValue::Date(value) => write!(f, "{}", value.timestamp_millis()),
        }
    }
}

/// Immutable, identity-defining input to a job launch.
///
/// Two launches with identical parameters are the same logical run; a new run
/// requires at least one differing parameter, typically a timestamp added by
/// the caller. Parameters are shared by reference between the job instance and
/// its executions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobParameters {
    parameters: Arc<BTreeMap<String, ParameterValue>>,
}

impl JobParameters {
    /// Returns a builder for assembling job parameters.
    pub fn builder() -> JobParametersBuilder {
        JobParametersBuilder::new()
    }

    /// Returns the parameter stored under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns whether no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Returns the deterministic identity fragment of these parameters.
    ///
    /// The fragment enumerates entries in key order, so identical parameter
    /// maps always produce identical fragments regardless of insertion order.
    pub fn identity_fragment(&self) -> String {
        self.parameters
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for JobParameters {
    fn default() -> Self {
        JobParametersBuilder::new().build()
    }
}

/// Builder for [`JobParameters`].
#[derive(Debug, Default)]
pub struct JobParametersBuilder {
    parameters: BTreeMap<String, ParameterValue>,
}

impl JobParametersBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text parameter.
    pub fn add_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .insert(name.into(), ParameterValue::String(value.into()));
        self
    }

    /// Adds an integer parameter.
    pub fn add_long(mut self, name: impl Into<String>, value: i64) -> Self {
        self.parameters
            .insert(name.into(), ParameterValue::Long(value));
        self
    }

    /// Adds a floating point parameter.
    pub fn add_double(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters
            .insert(name.into(), ParameterValue::Double(value));
        self
    }

    /// Adds a timestamp parameter.
    pub fn add_date(mut self, name: impl Into<String>, value: DateTime<Utc>) -> Self {
        self.parameters
            .insert(name.into(), ParameterValue::Date(value));
        self
    }

    /// Finalizes the builder into immutable [`JobParameters`].
    pub fn build(self) -> JobParameters {
        JobParameters {
            parameters: Arc::new(self.parameters),
        }
    }
}
