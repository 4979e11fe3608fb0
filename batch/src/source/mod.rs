//! Record source contract and built-in sources.

pub mod base;
pub mod delimited;
pub mod memory;

pub use base::RecordSource;
