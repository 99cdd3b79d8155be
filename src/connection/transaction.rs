//! Transaction adapter

use super::conn::Connection;
use crate::driver;
use crate::error::translate;
use crate::protocol::NativeConnection;
use crate::result::{QueryResult, Rows};
use crate::value::Value;
use crate::Result;

/// Transaction on a live connection.
///
/// Holds the connection's session exclusively; there is no separate session
/// and no nesting. Commit and rollback consume the transaction. Dropping it
/// leaves the server transaction open until the connection's next `begin`.
pub struct Transaction<'c, C> {
    conn: &'c mut Connection<C>,
}

impl<'c, C: NativeConnection> Transaction<'c, C> {
    pub(super) fn new(conn: &'c mut Connection<C>) -> Self {
        Self { conn }
    }

    /// Execute a statement inside the transaction
    pub async fn exec(&mut self, query: &str, args: &[Value]) -> Result<QueryResult> {
        self.conn.exec(query, args).await
    }

    /// Run a query inside the transaction
    pub async fn query(&mut self, query: &str, args: &[Value]) -> Result<Rows> {
        self.conn.query(query, args).await
    }

    /// Commit the transaction
    pub async fn commit(self) -> Result<()> {
        tracing::debug!("commit");
        let result = self.conn.native_mut().commit().await;
        self.conn.end_tx();
        result.map_err(|e| translate("commit", e))
    }

    /// Roll back the transaction
    pub async fn rollback(self) -> Result<()> {
        tracing::debug!("rollback");
        let result = self.conn.native_mut().rollback().await;
        self.conn.end_tx();
        result.map_err(|e| translate("rollback", e))
    }
}

impl<C: NativeConnection> driver::Tx for Transaction<'_, C> {
    async fn commit(self) -> Result<()> {
        Transaction::commit(self).await
    }

    async fn rollback(self) -> Result<()> {
        Transaction::rollback(self).await
    }
}

impl<C> std::fmt::Debug for Transaction<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction").finish_non_exhaustive()
    }
}
