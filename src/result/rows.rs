//! Row cursor over a materialized result set

use crate::protocol::Resultset;
use crate::value::Value;
use crate::{Error, Result};

/// Forward-only cursor.
///
/// The cursor is active while rows remain, exhausted once every row was
/// read, and closed after [`Rows::close`]. Closing is terminal.
#[derive(Debug)]
pub struct Rows {
    resultset: Resultset,
    columns: Vec<String>,
    /// Next row to read; `None` once closed
    step: Option<usize>,
}

impl Rows {
    /// Create a cursor positioned before the first row.
    ///
    /// Fails if the query produced no result set.
    pub fn new(resultset: Option<Resultset>) -> Result<Self> {
        let resultset = resultset.ok_or_else(|| {
            Error::InvalidResult("invalid mysql query, no correct result".into())
        })?;
        let columns = resultset
            .fields()
            .iter()
            .map(|f| f.name.clone())
            .collect();

        Ok(Self {
            resultset,
            columns,
            step: Some(0),
        })
    }

    /// Column names, in result order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Copy the next row into `dest`, one value per column.
    ///
    /// Returns `Error::NoMoreRows` once every row was read and
    /// `Error::CursorClosed` after [`Rows::close`].
    pub fn next(&mut self, dest: &mut [Value]) -> Result<()> {
        let step = self.step.ok_or(Error::CursorClosed)?;
        if step >= self.resultset.row_count() {
            return Err(Error::NoMoreRows);
        }

        let columns = self.resultset.column_count();
        if dest.len() < columns {
            return Err(Error::Destination {
                expected: columns,
                actual: dest.len(),
            });
        }

        for (i, slot) in dest.iter_mut().take(columns).enumerate() {
            *slot = self
                .resultset
                .get_value(step, i)
                .map_err(|source| Error::Client {
                    context: "fetch",
                    source,
                })?;
        }

        self.step = Some(step + 1);
        crate::metrics::counters::row_fetched();
        Ok(())
    }

    /// Close the cursor. Always succeeds and may be called repeatedly.
    pub fn close(&mut self) -> Result<()> {
        self.step = None;
        Ok(())
    }

    /// Check if the cursor was closed
    pub fn is_closed(&self) -> bool {
        self.step.is_none()
    }
}

impl crate::driver::Rows for Rows {
    fn columns(&self) -> &[String] {
        Rows::columns(self)
    }

    fn next(&mut self, dest: &mut [Value]) -> Result<()> {
        Rows::next(self, dest)
    }

    fn close(&mut self) -> Result<()> {
        Rows::close(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ClientError, Field};

    fn two_rows() -> Resultset {
        Resultset::new(
            vec![Field::new("c1"), Field::new("c2")],
            vec![
                vec![Value::Int(1), Value::from("one")],
                vec![Value::Int(2), Value::from("two")],
            ],
        )
    }

    #[test]
    fn test_columns() {
        let rows = Rows::new(Some(two_rows())).unwrap();
        assert_eq!(rows.columns(), ["c1", "c2"]);
    }

    #[test]
    fn test_next_until_exhausted() {
        let mut rows = Rows::new(Some(two_rows())).unwrap();
        let mut dest = vec![Value::Null; 2];

        rows.next(&mut dest).unwrap();
        assert_eq!(dest, [Value::Int(1), Value::from("one")]);

        rows.next(&mut dest).unwrap();
        assert_eq!(dest, [Value::Int(2), Value::from("two")]);

        assert!(matches!(rows.next(&mut dest), Err(Error::NoMoreRows)));
        assert!(matches!(rows.next(&mut dest), Err(Error::NoMoreRows)));
    }

    #[test]
    fn test_close_with_rows_remaining() {
        let mut rows = Rows::new(Some(two_rows())).unwrap();
        let mut dest = vec![Value::Null; 2];
        rows.next(&mut dest).unwrap();

        rows.close().unwrap();
        assert!(rows.is_closed());
        assert!(matches!(rows.next(&mut dest), Err(Error::CursorClosed)));

        // Closing again is harmless
        rows.close().unwrap();
        assert!(matches!(rows.next(&mut dest), Err(Error::CursorClosed)));
    }

    #[test]
    fn test_close_after_exhaustion() {
        let mut rows = Rows::new(Some(Resultset::new(vec![Field::new("c1")], vec![]))).unwrap();
        let mut dest = vec![Value::Null];
        assert!(matches!(rows.next(&mut dest), Err(Error::NoMoreRows)));

        rows.close().unwrap();
        assert!(matches!(rows.next(&mut dest), Err(Error::CursorClosed)));
    }

    #[test]
    fn test_missing_resultset() {
        assert!(matches!(Rows::new(None), Err(Error::InvalidResult(_))));
    }

    #[test]
    fn test_short_destination() {
        let mut rows = Rows::new(Some(two_rows())).unwrap();
        let mut dest = vec![Value::Null; 1];
        assert!(matches!(
            rows.next(&mut dest),
            Err(Error::Destination {
                expected: 2,
                actual: 1
            })
        ));

        // The failed call does not advance the cursor
        let mut dest = vec![Value::Null; 2];
        rows.next(&mut dest).unwrap();
        assert_eq!(dest[0], Value::Int(1));
    }

    #[test]
    fn test_cell_failure_is_not_translated() {
        // Second row is missing a cell
        let resultset = Resultset::new(
            vec![Field::new("c1"), Field::new("c2")],
            vec![vec![Value::Int(1), Value::Int(2)], vec![Value::Int(3)]],
        );
        let mut rows = Rows::new(Some(resultset)).unwrap();
        let mut dest = vec![Value::Null; 2];
        rows.next(&mut dest).unwrap();

        let err = rows.next(&mut dest).unwrap_err();
        assert!(!err.is_bad_connection());
        assert!(matches!(
            err.client_error(),
            Some(ClientError::OutOfRange { row: 1, column: 1 })
        ));
    }
}
