//! Query outcomes
//!
//! * `QueryResult`: insert id and affected rows of a write
//! * `Rows`: forward-only cursor over a materialized result set

mod outcome;
mod rows;

pub use outcome::QueryResult;
pub use rows::Rows;
