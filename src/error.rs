//! Error types and the error translation policy
//!
//! The driver surfaces two kinds of failure to the calling framework:
//! * `ErrorKind::BadConnection`: the session is dead. Discard it and reopen.
//! * `ErrorKind::Failure`: this operation failed. Report it to the application.

use crate::protocol::ClientError;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Driver error
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed DSN or TLS material
    #[error("config error: {0}")]
    Config(String),

    /// `ssl` query parameter with an unknown value
    #[error("unsupported ssl option '{0}': supported options are ssl=true or ssl=custom")]
    UnsupportedSsl(String),

    /// Connection is no longer usable
    #[error("bad connection")]
    BadConnection,

    /// Operation failed on an otherwise healthy session
    #[error("{context} failed: {source}")]
    Client {
        /// Operation that produced the error
        context: &'static str,
        /// Original cause reported by the protocol client
        #[source]
        source: ClientError,
    },

    /// Cursor exhausted
    #[error("no more rows")]
    NoMoreRows,

    /// Cursor used after close
    #[error("cursor closed")]
    CursorClosed,

    /// Query completed without a result set
    #[error("invalid result: {0}")]
    InvalidResult(String),

    /// Destination slice cannot hold a full row
    #[error("destination holds {actual} values, row has {expected} columns")]
    Destination {
        /// Number of columns in the row
        expected: usize,
        /// Number of destination slots supplied
        actual: usize,
    },
}

/// Error classification visible to the calling framework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Discard the connection and open a new one
    BadConnection,
    /// Report to the application
    Failure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadConnection => write!(f, "bad_connection"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

impl Error {
    /// Classify this error for the calling framework
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BadConnection => ErrorKind::BadConnection,
            _ => ErrorKind::Failure,
        }
    }

    /// Check if the calling framework should discard the connection
    pub fn is_bad_connection(&self) -> bool {
        self.kind() == ErrorKind::BadConnection
    }

    /// Check if this is the end-of-rows signal
    pub fn is_end_of_rows(&self) -> bool {
        matches!(self, Error::NoMoreRows)
    }

    /// Original protocol client error, if any
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Error::Client { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Map a protocol client error to the driver-visible error.
///
/// Dead-connection errors become `Error::BadConnection`; everything else is
/// wrapped with the operation name and keeps the original cause.
pub fn translate(context: &'static str, err: ClientError) -> Error {
    if err.is_bad_connection() {
        tracing::warn!(operation = context, error = %err, "connection is no longer usable");
        crate::metrics::counters::error_translated(ErrorKind::BadConnection);
        Error::BadConnection
    } else {
        crate::metrics::counters::error_translated(ErrorKind::Failure);
        Error::Client {
            context,
            source: err,
        }
    }
}
