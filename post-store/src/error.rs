//! Error types for connection and repository operations

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::ids::PostIdError;

// ============================================================================
// Structured Store Errors
// ============================================================================

/// Store operation being performed when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Opening the connection to the store
    Connect,
    /// Authenticating with root credentials
    SignIn,
    /// Selecting the namespace and database
    SelectDatabase,
    /// Liveness round trip
    Ping,
    /// Inserting a record
    Insert,
    /// Reading one or more records
    Find,
    /// Deleting records
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::SignIn => write!(f, "sign_in"),
            Self::SelectDatabase => write!(f, "select_database"),
            Self::Ping => write!(f, "ping"),
            Self::Insert => write!(f, "insert"),
            Self::Find => write!(f, "find"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Network level failure reaching the store
    ConnectionFailed,
    /// Credentials were rejected
    Authentication,
    /// The session lacks permission for the operation
    PermissionDenied,
    /// Namespace, database or table could not be resolved
    NotFound,
    /// The store reported a timeout of its own
    Timeout,
    /// A record could not be decoded into a post
    Decode,
    /// Statement execution failed
    QueryFailed,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Authentication => write!(f, "authentication"),
            Self::PermissionDenied => write!(f, "permission_denied"),
            Self::NotFound => write!(f, "not_found"),
            Self::Timeout => write!(f, "timeout"),
            Self::Decode => write!(f, "decode"),
            Self::QueryFailed => write!(f, "query_failed"),
        }
    }
}

/// Structured store error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// The operation being performed when the error occurred
    pub operation: StoreOperation,
    /// The category of error
    pub kind: StoreErrorKind,
    /// Driver supplied message
    pub message: String,
    /// Additional context (e.g., collection name, calling step)
    pub context: Option<String>,
}

impl StoreError {
    /// Create a new store error
    pub fn new(operation: StoreOperation, kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Build an error from a SurrealDB driver error, classifying it by its message
    pub fn from_driver(operation: StoreOperation, err: &surrealdb::Error) -> Self {
        let message = err.to_string();
        Self::new(operation, categorize(&message), message)
    }

    /// Create a decode error
    pub fn decode(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Decode, message)
    }

    /// Add context to an existing error
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Short operator-facing hint for the error category
    pub fn hint(&self) -> &'static str {
        match self.kind {
            StoreErrorKind::Authentication => "Authentication error - check your credentials",
            StoreErrorKind::ConnectionFailed => "Network connection error - check connectivity",
            StoreErrorKind::PermissionDenied => "Permission error - check database permissions",
            StoreErrorKind::NotFound => "Resource not found - check namespace/database exists",
            StoreErrorKind::Timeout => "Store timeout - database may be overloaded",
            StoreErrorKind::Decode => "Stored record does not match the post shape",
            StoreErrorKind::QueryFailed => "Store error",
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref ctx) = self.context {
            write!(f, " [context: {}]", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}

/// Classify a driver error message
fn categorize(message: &str) -> StoreErrorKind {
    let lower = message.to_lowercase();

    if lower.contains("auth") || lower.contains("credentials") || lower.contains("signin") {
        StoreErrorKind::Authentication
    } else if lower.contains("permission") || lower.contains("denied") || lower.contains("not allowed") {
        StoreErrorKind::PermissionDenied
    } else if lower.contains("connect")
        || lower.contains("network")
        || lower.contains("dns")
        || lower.contains("refused")
    {
        StoreErrorKind::ConnectionFailed
    } else if lower.contains("timeout") || lower.contains("timed out") {
        StoreErrorKind::Timeout
    } else if lower.contains("not found") || lower.contains("does not exist") || lower.contains("no such") {
        StoreErrorKind::NotFound
    } else {
        StoreErrorKind::QueryFailed
    }
}

/// Sanitize a connection URL by removing credentials
pub fn sanitize_url(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(scheme_end) = url.find("://") {
            if scheme_end < at_pos {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos + 1..];
                return format!("{}<redacted>@{}", scheme, after_at);
            }
        }
    }
    url.to_string()
}

// ============================================================================
// Crate Error
// ============================================================================

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the post store
///
/// Absence is not an error: a well-formed identifier with no record yields
/// `Ok(None)` from lookups and a zero count from deletes.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Opening the connection or the liveness check failed
    #[error("Connection error: {0}")]
    Connection(StoreError),

    /// The operation exceeded its time bound
    #[error("Operation {operation} timed out after {limit:?}")]
    Timeout {
        /// Operation that was in flight
        operation: StoreOperation,
        /// Bound that was exceeded
        limit: Duration,
    },

    /// Caller supplied an identifier that is not in the store's format
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] PostIdError),

    /// Any other store reported failure
    #[error("{0}")]
    Store(StoreError),
}

impl Error {
    /// Check if this error is transient (the library itself never retries)
    pub fn is_retriable(&self) -> bool {
        match self {
            Error::Timeout { .. } | Error::Connection(_) => true,
            Error::Store(e) => matches!(
                e.kind,
                StoreErrorKind::ConnectionFailed | StoreErrorKind::Timeout
            ),
            Error::Config(_) | Error::InvalidIdentifier(_) => false,
        }
    }

    /// The store operation involved, if any
    pub fn operation(&self) -> Option<StoreOperation> {
        match self {
            Error::Connection(e) | Error::Store(e) => Some(e.operation),
            Error::Timeout { operation, .. } => Some(*operation),
            Error::Config(_) | Error::InvalidIdentifier(_) => None,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_operation_display() {
        assert_eq!(StoreOperation::Connect.to_string(), "connect");
        assert_eq!(StoreOperation::SignIn.to_string(), "sign_in");
        assert_eq!(StoreOperation::SelectDatabase.to_string(), "select_database");
        assert_eq!(StoreOperation::Insert.to_string(), "insert");
        assert_eq!(StoreOperation::Delete.to_string(), "delete");
    }

    #[test]
    fn test_store_error_display_with_context() {
        let err = StoreError::new(StoreOperation::Insert, StoreErrorKind::QueryFailed, "boom")
            .with_context("ensure_collection_exists");
        assert_eq!(
            err.to_string(),
            "Store query_failed error during insert: boom [context: ensure_collection_exists]"
        );
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("There was a problem with authentication"), StoreErrorKind::Authentication);
        assert_eq!(categorize("Connection refused (os error 111)"), StoreErrorKind::ConnectionFailed);
        assert_eq!(categorize("IAM error: Not enough permissions"), StoreErrorKind::PermissionDenied);
        assert_eq!(categorize("The namespace 'x' does not exist"), StoreErrorKind::NotFound);
        assert_eq!(categorize("The query was not executed due to a timeout"), StoreErrorKind::Timeout);
        assert_eq!(categorize("Parse error: unexpected token"), StoreErrorKind::QueryFailed);
    }

    #[test]
    fn test_sanitize_url() {
        assert_eq!(
            sanitize_url("ws://root:secret@localhost:8000/blog?authSource=admin"),
            "ws://<redacted>@localhost:8000/blog?authSource=admin"
        );
        assert_eq!(sanitize_url("mem://"), "mem://");
        assert_eq!(sanitize_url("ws://localhost:8000"), "ws://localhost:8000");
    }

    #[test]
    fn test_sanitize_url_password_with_at_sign() {
        let sanitized = sanitize_url("ws://root:p@ss@db:8000/blog");
        assert_eq!(sanitized, "ws://<redacted>@db:8000/blog");
        assert!(!sanitized.contains("p@ss"));
    }

    #[test]
    fn test_is_retriable() {
        let timeout = Error::Timeout {
            operation: StoreOperation::Find,
            limit: Duration::from_secs(10),
        };
        assert!(timeout.is_retriable());
        assert_eq!(timeout.operation(), Some(StoreOperation::Find));

        let query = Error::Store(StoreError::new(
            StoreOperation::Insert,
            StoreErrorKind::QueryFailed,
            "bad",
        ));
        assert!(!query.is_retriable());

        let invalid: Error = "no-dashes".parse::<crate::ids::PostId>().unwrap_err().into();
        assert!(!invalid.is_retriable());
        assert_eq!(invalid.operation(), None);
    }
}
