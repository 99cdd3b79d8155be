//! Write outcome

use crate::protocol::ExecOutcome;

/// Outcome of a statement that does not return rows.
///
/// Captured when the statement completes and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryResult {
    last_insert_id: u64,
    rows_affected: u64,
}

impl QueryResult {
    /// Create an outcome from its two counters
    pub fn new(last_insert_id: u64, rows_affected: u64) -> Self {
        Self {
            last_insert_id,
            rows_affected,
        }
    }

    /// Id generated for an AUTO_INCREMENT column by the last insert
    pub fn last_insert_id(&self) -> u64 {
        self.last_insert_id
    }

    /// Number of rows changed
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }
}

impl From<&ExecOutcome> for QueryResult {
    fn from(outcome: &ExecOutcome) -> Self {
        Self::new(outcome.insert_id, outcome.affected_rows)
    }
}

impl crate::driver::ExecResult for QueryResult {
    fn last_insert_id(&self) -> u64 {
        self.last_insert_id
    }

    fn rows_affected(&self) -> u64 {
        self.rows_affected
    }
}
