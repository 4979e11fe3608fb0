//! Chunk-oriented batch job engine.
//!
//! Executes a single batch job composed of one or more steps, each moving
//! records from a [`source::RecordSource`] to a [`sink::RecordSink`] in
//! fixed-size transactional chunks, tracking execution metadata per step and
//! per job and reporting progress through lifecycle listeners.

pub mod chunk;
pub mod dispatcher;
pub mod error;
pub mod job;
pub mod listener;
mod macros;
pub mod repository;
pub mod signal;
pub mod sink;
pub mod source;
pub mod step;
pub mod types;
