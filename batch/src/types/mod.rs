//! Common types used throughout the batch engine.
//!
//! Re-exports record values, job parameters, and execution metadata types.

mod cell;
mod execution;
mod parameters;

pub use cell::*;
pub use execution::*;
pub use parameters::*;
