//! Generic driver contract
//!
//! The traits a database-access framework programs against. Any backend
//! implementing them can be opened by DSN, pooled and queried without
//! vendor-specific calling conventions.
//!
//! Errors crossing this boundary are classified by [`Error::kind`]:
//! `BadConnection` tells the framework to discard the connection, anything
//! else is reported to the application. [`Rows::next`] signals the end of
//! the rows with [`Error::NoMoreRows`].
//!
//! [`Error::kind`]: crate::Error::kind
//! [`Error::NoMoreRows`]: crate::Error::NoMoreRows

use crate::value::Value;
use crate::Result;
use std::future::Future;

/// Opens connections from a DSN
pub trait Driver: Send + Sync {
    /// Connection type
    type Conn: Conn;

    /// Name the driver registers under
    fn name(&self) -> &'static str;

    /// Open a connection
    fn open(&self, dsn: &str) -> impl Future<Output = Result<Self::Conn>>;
}

/// A connection checked out by one caller at a time
pub trait Conn: Send {
    /// Prepared statement type, borrowing the connection
    type Stmt<'c>: Stmt<Result = Self::Result, Rows = Self::Rows>
    where
        Self: 'c;
    /// Transaction type, borrowing the connection
    type Tx<'c>: Tx
    where
        Self: 'c;
    /// Write outcome type
    type Result: ExecResult;
    /// Row cursor type
    type Rows: Rows;

    /// Prepare a statement
    fn prepare(&mut self, query: &str) -> impl Future<Output = Result<Self::Stmt<'_>>>;

    /// Start a transaction
    fn begin(&mut self) -> impl Future<Output = Result<Self::Tx<'_>>>;

    /// Execute a statement that does not return rows
    fn exec(&mut self, query: &str, args: &[Value]) -> impl Future<Output = Result<Self::Result>>;

    /// Execute a query
    fn query(&mut self, query: &str, args: &[Value]) -> impl Future<Output = Result<Self::Rows>>;

    /// Close the connection
    fn close(self) -> impl Future<Output = Result<()>>;
}

/// A prepared statement
pub trait Stmt: Send {
    /// Write outcome type
    type Result: ExecResult;
    /// Row cursor type
    type Rows: Rows;

    /// Number of placeholders, checked against call-site arguments
    fn num_input(&self) -> usize;

    /// Execute a statement that does not return rows
    fn exec(&mut self, args: &[Value]) -> impl Future<Output = Result<Self::Result>>;

    /// Execute a query
    fn query(&mut self, args: &[Value]) -> impl Future<Output = Result<Self::Rows>>;

    /// Release the statement
    fn close(self) -> impl Future<Output = Result<()>>;
}

/// An open transaction
pub trait Tx {
    /// Commit
    fn commit(self) -> impl Future<Output = Result<()>>;

    /// Roll back
    fn rollback(self) -> impl Future<Output = Result<()>>;
}

/// Outcome of a write
pub trait ExecResult {
    /// Id generated by the last insert
    fn last_insert_id(&self) -> u64;

    /// Number of rows changed
    fn rows_affected(&self) -> u64;
}

/// Forward-only row cursor
pub trait Rows {
    /// Column names
    fn columns(&self) -> &[String];

    /// Copy the next row into `dest`
    fn next(&mut self, dest: &mut [Value]) -> Result<()>;

    /// Close the cursor
    fn close(&mut self) -> Result<()>;
}
