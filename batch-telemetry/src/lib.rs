//! Telemetry initialization for batch services.

pub mod tracing;
