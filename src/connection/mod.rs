//! Connection management
//!
//! This module handles:
//! * The connection, statement and transaction adapters
//! * TLS configuration and the per-address TLS profile registry

mod conn;
mod statement;
mod tls;
mod transaction;

pub use conn::Connection;
pub use statement::Statement;
pub use tls::{SslMode, TlsConfig, TlsConfigBuilder, TlsRegistry};
pub use transaction::Transaction;
