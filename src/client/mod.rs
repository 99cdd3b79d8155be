//! Driver entry points
//!
//! * DSN parsing
//! * `MySqlDriver`, which opens connections through a protocol connector

mod dsn;
mod sql_driver;

pub use dsn::{parse_addr, ConnectionParams};
pub use sql_driver::{MySqlDriver, DRIVER_NAME};
