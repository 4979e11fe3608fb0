//! Record sink contract and built-in sinks.

pub mod base;
pub mod memory;
pub mod postgres;

pub use base::{RecordSink, SinkTransaction};
