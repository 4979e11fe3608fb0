//! Configuration types and loading for the batch engine.
//!
//! Provides the shared configuration structures consumed by the engine and the
//! runner binary, plus hierarchical loading from configuration files and
//! environment variable overrides.

mod load;
pub mod shared;

pub use load::{LoadConfigError, load_config};
