//! Connection adapter

use super::statement::Statement;
use super::transaction::Transaction;
use crate::driver;
use crate::error::translate;
use crate::protocol::NativeConnection;
use crate::result::{QueryResult, Rows};
use crate::value::Value;
use crate::Result;

/// Driver connection over one protocol session.
///
/// Not internally synchronized: the owning framework hands a connection to
/// one caller at a time.
pub struct Connection<C> {
    inner: C,
    in_tx: bool,
}

impl<C: NativeConnection> Connection<C> {
    /// Wrap an open protocol session
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            in_tx: false,
        }
    }

    pub(super) fn native_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Mark the server transaction as finished
    pub(super) fn end_tx(&mut self) {
        self.in_tx = false;
    }

    /// Whether a server transaction is still open.
    ///
    /// Stays set when a [`Transaction`] is dropped without commit or rollback.
    pub fn in_transaction(&self) -> bool {
        self.in_tx
    }

    /// Prepare a statement
    pub async fn prepare(&mut self, query: &str) -> Result<Statement<'_, C::Stmt>> {
        tracing::debug!(query = %query, "prepare");
        let stmt = self
            .inner
            .prepare(query)
            .await
            .map_err(|e| translate("prepare", e))?;
        Ok(Statement::new(stmt))
    }

    /// Start a transaction on this session.
    ///
    /// The connection stays borrowed until the transaction is committed or
    /// rolled back. A transaction that was dropped instead is rolled back
    /// here before the new one starts.
    pub async fn begin(&mut self) -> Result<Transaction<'_, C>> {
        if self.in_tx {
            tracing::warn!("rolling back transaction dropped without commit or rollback");
            self.inner
                .rollback()
                .await
                .map_err(|e| translate("rollback", e))?;
            self.in_tx = false;
        }

        tracing::debug!("begin");
        self.inner
            .begin()
            .await
            .map_err(|e| translate("begin", e))?;
        self.in_tx = true;
        Ok(Transaction::new(self))
    }

    /// Execute a statement that does not return rows
    pub async fn exec(&mut self, query: &str, args: &[Value]) -> Result<QueryResult> {
        let outcome = self
            .inner
            .execute(query, args)
            .await
            .map_err(|e| translate("exec", e))?;
        Ok(QueryResult::from(&outcome))
    }

    /// Execute a query and return its rows
    pub async fn query(&mut self, query: &str, args: &[Value]) -> Result<Rows> {
        let outcome = self
            .inner
            .execute(query, args)
            .await
            .map_err(|e| translate("query", e))?;
        Rows::new(outcome.resultset)
    }

    /// Close the session
    pub async fn close(mut self) -> Result<()> {
        tracing::debug!("close");
        self.inner.close().await.map_err(|e| translate("close", e))
    }
}

impl<C: NativeConnection> driver::Conn for Connection<C> {
    type Stmt<'c> = Statement<'c, C::Stmt> where Self: 'c;
    type Tx<'c> = Transaction<'c, C> where Self: 'c;
    type Result = QueryResult;
    type Rows = Rows;

    async fn prepare(&mut self, query: &str) -> Result<Statement<'_, C::Stmt>> {
        Connection::prepare(self, query).await
    }

    async fn begin(&mut self) -> Result<Transaction<'_, C>> {
        Connection::begin(self).await
    }

    async fn exec(&mut self, query: &str, args: &[Value]) -> Result<QueryResult> {
        Connection::exec(self, query, args).await
    }

    async fn query(&mut self, query: &str, args: &[Value]) -> Result<Rows> {
        Connection::query(self, query, args).await
    }

    async fn close(self) -> Result<()> {
        Connection::close(self).await
    }
}

impl<C> std::fmt::Debug for Connection<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("in_tx", &self.in_tx)
            .finish_non_exhaustive()
    }
}
