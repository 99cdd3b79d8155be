//! mysql-sqldriver: generic database driver adapter for a MySQL protocol client
//!
//! The protocol client (wire protocol, authentication, TLS transport) is
//! supplied by the host through the [`protocol::Connector`] trait. This crate
//! adds what a generic database-access framework needs on top of it:
//!
//! * DSN parsing, including `ssl=true` and `ssl=custom`
//! * A per-address TLS profile registry for `ssl=custom`
//! * Connection, statement, transaction, result and row cursor adapters
//!   implementing the [`driver`] contract
//! * Error translation: a dead session surfaces as [`Error::BadConnection`],
//!   every other failure keeps its original cause
//!
//! # Example
//!
//! ```ignore
//! use mysql_sqldriver::{MySqlDriver, TlsRegistry, Value};
//!
//! let driver = MySqlDriver::new(connector, TlsRegistry::new());
//! let mut conn = driver.open("app:secret@127.0.0.1:3306/app").await?;
//!
//! let mut rows = conn.query("SELECT id, name FROM users WHERE id > ?", &[Value::Int(10)]).await?;
//! let mut row = vec![Value::Null; rows.columns().len()];
//! loop {
//!     match rows.next(&mut row) {
//!         Ok(()) => println!("{:?}", row),
//!         Err(e) if e.is_end_of_rows() => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod connection;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod protocol;
pub mod result;
pub mod value;

pub use client::{ConnectionParams, MySqlDriver, DRIVER_NAME};
pub use connection::{Connection, SslMode, Statement, TlsConfig, TlsRegistry, Transaction};
pub use error::{Error, ErrorKind, Result};
pub use result::{QueryResult, Rows};
pub use value::Value;
