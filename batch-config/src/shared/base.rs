use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Chunk size cannot be zero.
    #[error("`chunk_size` cannot be zero")]
    ChunkSizeZero,
    /// Maximum in-flight chunks cannot be zero.
    #[error("`max_in_flight_chunks` cannot be zero")]
    MaxInFlightChunksZero,
    /// A job or step was declared without a name.
    #[error("job and step names cannot be empty")]
    EmptyName,
    /// A job was declared without steps.
    #[error("a job must declare at least one step")]
    NoSteps,
    /// The source field list is empty.
    #[error("`field_names` cannot be empty")]
    EmptyFieldNames,
    /// The sink column list is empty.
    #[error("`columns` cannot be empty")]
    EmptyColumns,
    /// Source fields and sink columns must line up one-to-one.
    #[error("sink declares {columns} columns but source declares {fields} fields")]
    ColumnFieldCountMismatch { columns: usize, fields: usize },
}
