use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Chunk processing configuration for a step.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChunkConfig {
    /// Number of records accumulated from the source before a chunk is committed.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Maximum number of chunk commits that may be in flight at once.
    ///
    /// Reading stays serialized on the single source cursor; values above 1 only
    /// let a chunk's write and commit overlap with the next chunk's read.
    #[serde(default = "default_max_in_flight_chunks")]
    pub max_in_flight_chunks: usize,
}

impl ChunkConfig {
    /// Default number of records per chunk.
    pub const DEFAULT_CHUNK_SIZE: usize = 100;

    /// Default number of in-flight chunk commits.
    pub const DEFAULT_MAX_IN_FLIGHT_CHUNKS: usize = 1;

    /// Validates chunk configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chunk_size == 0 {
            return Err(ValidationError::ChunkSizeZero);
        }

        if self.max_in_flight_chunks == 0 {
            return Err(ValidationError::MaxInFlightChunksZero);
        }

        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            max_in_flight_chunks: default_max_in_flight_chunks(),
        }
    }
}

fn default_chunk_size() -> usize {
    ChunkConfig::DEFAULT_CHUNK_SIZE
}

fn default_max_in_flight_chunks() -> usize {
    ChunkConfig::DEFAULT_MAX_IN_FLIGHT_CHUNKS
}
