//! Execution metadata storage.

pub mod base;
pub mod memory;

pub use base::JobRepository;
