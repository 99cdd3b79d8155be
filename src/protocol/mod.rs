//! Native protocol client interface
//!
//! The MySQL wire protocol, authentication and TLS transport live in the
//! protocol client library. This module declares the surface the driver
//! needs from it:
//! * `Connector` opens a session from `ConnectOptions`
//! * `NativeConnection` executes queries and controls transactions
//! * `NativeStatement` executes a prepared statement
//! * `ExecOutcome` / `Resultset` carry what a query returned

mod resultset;

pub use resultset::{Field, Resultset};

use crate::connection::TlsConfig;
use crate::value::Value;
use std::future::Future;
use std::sync::Arc;

/// Error reported by the protocol client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The session is dead and cannot be reused
    #[error("connection is no longer usable: {0}")]
    BadConnection(String),

    /// Error packet returned by the server
    #[error("server error {code} ({state}): {message}")]
    Server {
        /// MySQL error code
        code: u16,
        /// SQLSTATE
        state: String,
        /// Server message
        message: String,
    },

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unexpected packet
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Cell index outside the result set
    #[error("cell ({row}, {column}) out of range")]
    OutOfRange {
        /// Row index
        row: usize,
        /// Column index
        column: usize,
    },
}

impl ClientError {
    /// Check if the session is no longer usable
    pub fn is_bad_connection(&self) -> bool {
        matches!(self, ClientError::BadConnection(_))
    }
}

/// Secure transport selection handed to the connector
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Plaintext
    #[default]
    Disabled,
    /// TLS without certificate verification
    SkipVerify,
    /// TLS using a registered profile.
    ///
    /// `None` when no profile was registered for the address. The connector
    /// decides whether to reject or ignore it.
    Custom(Option<Arc<TlsConfig>>),
}

impl TlsMode {
    /// Label used for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            TlsMode::Disabled => "disabled",
            TlsMode::SkipVerify => "skip-verify",
            TlsMode::Custom(_) => "custom",
        }
    }
}

/// Parameters for opening a protocol session
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// `host:port`
    pub addr: String,
    /// Username
    pub user: String,
    /// Password
    pub password: String,
    /// Database name (may be empty)
    pub database: String,
    /// Secure transport
    pub tls: TlsMode,
}

impl ConnectOptions {
    /// Create options with an empty password and database and no TLS
    pub fn new(addr: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            user: user.into(),
            password: String::new(),
            database: String::new(),
            tls: TlsMode::Disabled,
        }
    }

    /// Set password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set database
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set secure transport
    pub fn tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }
}

/// Outcome of executing a statement
#[derive(Debug, Clone, Default)]
pub struct ExecOutcome {
    /// Last auto-increment id generated
    pub insert_id: u64,
    /// Rows changed by the statement
    pub affected_rows: u64,
    /// Rows returned by the statement, if it produced any
    pub resultset: Option<Resultset>,
}

/// Opens protocol sessions
pub trait Connector: Send + Sync {
    /// Session type
    type Conn: NativeConnection;

    /// Open a session
    fn connect(
        &self,
        options: ConnectOptions,
    ) -> impl Future<Output = Result<Self::Conn, ClientError>>;
}

/// A live protocol session
pub trait NativeConnection: Send {
    /// Prepared statement type
    type Stmt: NativeStatement;

    /// Prepare a statement
    fn prepare(&mut self, query: &str)
        -> impl Future<Output = Result<Self::Stmt, ClientError>>;

    /// Execute a query with positional arguments
    fn execute(
        &mut self,
        query: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<ExecOutcome, ClientError>>;

    /// Start a transaction
    fn begin(&mut self) -> impl Future<Output = Result<(), ClientError>>;

    /// Commit the current transaction
    fn commit(&mut self) -> impl Future<Output = Result<(), ClientError>>;

    /// Roll back the current transaction
    fn rollback(&mut self) -> impl Future<Output = Result<(), ClientError>>;

    /// Close the session
    fn close(&mut self) -> impl Future<Output = Result<(), ClientError>>;
}

/// A server-side prepared statement
pub trait NativeStatement: Send {
    /// Number of `?` placeholders
    fn param_count(&self) -> usize;

    /// Execute with positional arguments
    fn execute(&mut self, args: &[Value])
        -> impl Future<Output = Result<ExecOutcome, ClientError>>;

    /// Deallocate the statement
    fn close(&mut self) -> impl Future<Output = Result<(), ClientError>>;
}
