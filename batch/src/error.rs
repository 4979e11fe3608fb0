//! Error types and result definitions for batch operations.
//!
//! Provides an error system with classification, aggregation, and captured
//! diagnostic metadata. [`BatchError`] represents either a single error with
//! rich context or multiple aggregated errors, which matters for steps where
//! several in-flight chunks can fail independently.

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Convenient result type for batch operations using [`BatchError`] as the error type.
pub type BatchResult<T> = Result<T, BatchError>;

/// Detailed payload stored for single [`BatchError`] instances.
#[derive(Debug, Clone)]
struct ErrorPayload {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
    backtrace: Arc<Backtrace>,
}

/// Main error type for batch operations.
#[derive(Debug, Clone)]
pub struct BatchError {
    repr: ErrorRepr,
}

/// Internal representation of error data.
#[derive(Debug, Clone)]
enum ErrorRepr {
    /// Single error payload holding rich metadata.
    Single(ErrorPayload),
    /// Multiple aggregated errors.
    ///
    /// Mainly useful to capture failures from several in-flight chunk commits.
    Many {
        errors: Vec<BatchError>,
        location: &'static Location<'static>,
    },
}

/// Specific categories of errors that can occur during batch execution.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Source errors.
    SourceIoError,
    MalformedRecord,
    SourceError,

    // Sink errors.
    SinkConnectionFailed,
    SinkError,

    // Job lifecycle errors.
    DuplicateJob,
    InvalidState,
    ChunkWorkerPanic,
    ListenerError,

    // Configuration errors.
    ConfigError,

    // Unknown / uncategorized.
    Unknown,
}

impl BatchError {
    /// Returns the [`ErrorKind`] of this error.
    ///
    /// For aggregated errors, returns the kind of the first error or
    /// [`ErrorKind::Unknown`] if the error list is empty.
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::Single(ref payload) => payload.kind,
            ErrorRepr::Many { ref errors, .. } => errors
                .first()
                .map(|err| err.kind())
                .unwrap_or(ErrorKind::Unknown),
        }
    }

    /// Returns all [`ErrorKind`]s present in this error.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        match self.repr {
            ErrorRepr::Single(ref payload) => vec![payload.kind],
            ErrorRepr::Many { ref errors, .. } => {
                errors.iter().flat_map(|err| err.kinds()).collect()
            }
        }
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        match self.repr {
            ErrorRepr::Single(ref payload) => payload.detail.as_deref(),
            ErrorRepr::Many { ref errors, .. } => errors.iter().find_map(|err| err.detail()),
        }
    }

    /// Returns the captured backtrace for this error.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self.repr {
            ErrorRepr::Single(ref payload) => Some(payload.backtrace.as_ref()),
            ErrorRepr::Many { .. } => None,
        }
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        match self.repr {
            ErrorRepr::Single(ref payload) => payload.location,
            ErrorRepr::Many { location, .. } => location,
        }
    }

    /// Attaches an originating [`error::Error`] to this error and returns the modified instance.
    ///
    /// Has no effect on aggregated errors because aggregates forward the first
    /// contained error as their source.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        if let ErrorRepr::Single(ref mut payload) = self.repr {
            payload.source = Some(Arc::new(source));
        }
        self
    }

    /// Creates a [`BatchError`] from its components.
    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        BatchError {
            repr: ErrorRepr::Single(ErrorPayload {
                kind,
                description,
                detail,
                source,
                location: Location::caller(),
                backtrace: Arc::new(Backtrace::capture()),
            }),
        }
    }
}

impl PartialEq for BatchError {
    /// Two errors compare equal when their kinds line up, ignoring captured context.
    fn eq(&self, other: &BatchError) -> bool {
        match (&self.repr, &other.repr) {
            (ErrorRepr::Single(a), ErrorRepr::Single(b)) => a.kind == b.kind,
            (ErrorRepr::Many { errors: a, .. }, ErrorRepr::Many { errors: b, .. }) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| a == b)
            }
            _ => false,
        }
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match &self.repr {
            ErrorRepr::Single(payload) => {
                let location = payload.location;
                write!(
                    f,
                    "[{:?}] {} @ {}:{}:{}",
                    payload.kind,
                    payload.description,
                    location.file(),
                    location.line(),
                    location.column()
                )?;

                if let Some(detail) = payload.detail.as_deref() {
                    write!(f, "\n  Detail: {detail}")?;
                }

                if let Some(source) = &payload.source {
                    write!(f, "\n  Caused by: {source}")?;
                }

                Ok(())
            }
            ErrorRepr::Many { errors, location } => {
                let count = errors.len();
                write!(
                    f,
                    "[Many] {} error{} aggregated @ {}:{}:{}",
                    count,
                    if count == 1 { "" } else { "s" },
                    location.file(),
                    location.line(),
                    location.column()
                )?;

                for (index, error) in errors.iter().enumerate() {
                    let rendered = format!("{error}");
                    for (line_index, line) in rendered.lines().enumerate() {
                        if line_index == 0 {
                            write!(f, "\n  {}. {}", index + 1, line)?;
                        } else {
                            write!(f, "\n     {line}")?;
                        }
                    }
                }

                Ok(())
            }
        }
    }
}

impl error::Error for BatchError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.repr {
            ErrorRepr::Single(payload) => payload
                .source
                .as_ref()
                .map(|source| source as &(dyn error::Error + 'static)),
            // For aggregated errors, the first contained error is the source.
            ErrorRepr::Many { errors, .. } => errors
                .first()
                .map(|error| error as &(dyn error::Error + 'static)),
        }
    }
}

/// Creates a [`BatchError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for BatchError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> BatchError {
        BatchError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates a [`BatchError`] from an error kind, static description, and dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for BatchError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> BatchError {
        BatchError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

/// Aggregates a vector of errors into one.
///
/// A vector with exactly one error is returned unwrapped instead of being
/// wrapped in an aggregate.
impl<E> From<Vec<E>> for BatchError
where
    E: Into<BatchError>,
{
    #[track_caller]
    fn from(errors: Vec<E>) -> BatchError {
        let location = Location::caller();

        let mut errors: Vec<BatchError> = errors.into_iter().map(Into::into).collect();

        if errors.len() == 1 {
            return errors.pop().expect("just checked length is 1");
        }

        BatchError {
            repr: ErrorRepr::Many { errors, location },
        }
    }
}

impl From<std::io::Error> for BatchError {
    #[track_caller]
    fn from(err: std::io::Error) -> BatchError {
        BatchError::from_components(
            ErrorKind::SourceIoError,
            Cow::Borrowed("An I/O error occurred while reading the record source"),
            Some(err.to_string().into()),
            Some(Arc::new(err)),
        )
    }
}

impl From<sqlx::Error> for BatchError {
    #[track_caller]
    fn from(err: sqlx::Error) -> BatchError {
        let kind = match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                ErrorKind::SinkConnectionFailed
            }
            _ => ErrorKind::SinkError,
        };

        BatchError::from_components(
            kind,
            Cow::Borrowed("A database error occurred in the record sink"),
            Some(err.to_string().into()),
            Some(Arc::new(err)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_error_exposes_kind_and_detail() {
        let err = BatchError::from((
            ErrorKind::SinkError,
            "Failed to write chunk",
            "insert rejected",
        ));

        assert_eq!(err.kind(), ErrorKind::SinkError);
        assert_eq!(err.detail(), Some("insert rejected"));
        assert!(err.backtrace().is_some());
    }

    #[test]
    fn aggregating_one_error_returns_it_unwrapped() {
        let errors = vec![BatchError::from((ErrorKind::SourceError, "Bad record"))];
        let err = BatchError::from(errors);

        assert_eq!(err.kinds(), vec![ErrorKind::SourceError]);
    }

    #[test]
    fn aggregated_errors_flatten_kinds() {
        let errors = vec![
            BatchError::from((ErrorKind::SinkError, "First failure")),
            BatchError::from((ErrorKind::ChunkWorkerPanic, "Second failure")),
        ];
        let err = BatchError::from(errors);

        assert_eq!(
            err.kinds(),
            vec![ErrorKind::SinkError, ErrorKind::ChunkWorkerPanic]
        );
        assert_eq!(err.kind(), ErrorKind::SinkError);
    }
}
