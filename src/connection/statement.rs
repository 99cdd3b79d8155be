//! Prepared statement adapter

use crate::driver;
use crate::error::translate;
use crate::protocol::NativeStatement;
use crate::result::{QueryResult, Rows};
use crate::value::Value;
use crate::Result;
use std::marker::PhantomData;

/// Prepared statement created by a [`Connection`](super::Connection).
///
/// Borrows the connection that prepared it, so it cannot outlive it.
pub struct Statement<'c, S> {
    inner: S,
    _conn: PhantomData<&'c mut ()>,
}

impl<S: NativeStatement> Statement<'_, S> {
    pub(super) fn new(inner: S) -> Self {
        Self {
            inner,
            _conn: PhantomData,
        }
    }

    /// Number of placeholders the statement expects
    pub fn num_input(&self) -> usize {
        self.inner.param_count()
    }

    /// Execute a statement that does not return rows
    pub async fn exec(&mut self, args: &[Value]) -> Result<QueryResult> {
        let outcome = self
            .inner
            .execute(args)
            .await
            .map_err(|e| translate("exec", e))?;
        Ok(QueryResult::from(&outcome))
    }

    /// Execute a query and return its rows
    pub async fn query(&mut self, args: &[Value]) -> Result<Rows> {
        let outcome = self
            .inner
            .execute(args)
            .await
            .map_err(|e| translate("query", e))?;
        Rows::new(outcome.resultset)
    }

    /// Deallocate the statement
    pub async fn close(mut self) -> Result<()> {
        self.inner
            .close()
            .await
            .map_err(|e| translate("close statement", e))
    }
}

impl<S: NativeStatement> driver::Stmt for Statement<'_, S> {
    type Result = QueryResult;
    type Rows = Rows;

    fn num_input(&self) -> usize {
        Statement::num_input(self)
    }

    async fn exec(&mut self, args: &[Value]) -> Result<QueryResult> {
        Statement::exec(self, args).await
    }

    async fn query(&mut self, args: &[Value]) -> Result<Rows> {
        Statement::query(self, args).await
    }

    async fn close(self) -> Result<()> {
        Statement::close(self).await
    }
}

impl<S> std::fmt::Debug for Statement<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement").finish_non_exhaustive()
    }
}
