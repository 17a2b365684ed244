use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for engine operations.
///
/// Each error kind describes a specific category of failure at the engine
/// boundary. The engine itself raises very few of these; coercion and driver
/// failures propagate through unmodified.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Operation Errors - raised for invalid payload construction
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Invalid data type for operation (e.g. a non-numeric decrement magnitude)
    InvalidDataType,

    // Coercion Errors - raised by schema coercion functions
    /// A coercion function rejected a value
    ValidationError,

    // Identity Errors - raised by the single-document session path
    /// The document carries no identifier
    NotIdentifiable,

    // Driver Errors - raised by the store driver collaborator
    /// Error from the store driver
    BackendError,

    // Generic/Internal Errors - used as fallback
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::NotIdentifiable => write!(f, "Not identifiable"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom error type for the engine.
///
/// `DocmodError` encapsulates the error message, kind, and optional cause.
/// It supports error chaining and backtraces for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use docmod::errors::{DocmodError, ErrorKind};
///
/// // Create a simple error
/// let err = DocmodError::new("no identifier", ErrorKind::NotIdentifiable);
///
/// // Create an error with a cause
/// let cause = DocmodError::new("connection reset", ErrorKind::BackendError);
/// let err = DocmodError::new_with_cause("update failed", ErrorKind::BackendError, cause);
/// ```
#[derive(Clone)]
pub struct DocmodError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<DocmodError>>,
    backtrace: Atomic<Backtrace>,
}

impl DocmodError {
    /// Creates a new `DocmodError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        DocmodError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `DocmodError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for
    /// debugging.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: DocmodError) -> Self {
        DocmodError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&Box<DocmodError>> {
        self.cause.as_ref()
    }
}

impl Display for DocmodError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for DocmodError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for DocmodError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for engine operations.
///
/// `DocmodResult<T>` is shorthand for `Result<T, DocmodError>`.
/// All fallible engine operations return this type.
pub type DocmodResult<T> = Result<T, DocmodError>;

impl From<String> for DocmodError {
    fn from(msg: String) -> Self {
        DocmodError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for DocmodError {
    fn from(msg: &str) -> Self {
        DocmodError::new(msg, ErrorKind::InternalError)
    }
}
