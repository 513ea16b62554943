//! Row-count contracts applied to a decoded statement result.
//!
//! - [`One`]: exactly one row, anything else is an error.
//! - [`ZeroOrOne`]: `Some(row)` for exactly one row, `None` otherwise.
//! - [`All`]: every row, in engine order.

use crate::ResultSet;

/// Row count did not match [`One`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CardinalityError {
    #[error("no results")]
    NoRows,
    #[error("expected exactly one row, got {0}")]
    TooManyRows(usize),
}

/// Policy reducing a statement's rows to the shape a caller asked for.
pub trait Cardinality {
    type Output<T>;

    fn reduce<T>(rows: Vec<T>) -> Result<Self::Output<T>, CardinalityError>;

    /// Reduces the rows of a result, passing execution metadata through.
    fn reduce_result<T>(
        result: ResultSet<Vec<T>>,
    ) -> Result<ResultSet<Self::Output<T>>, CardinalityError> {
        result.try_map(Self::reduce)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct One;

#[derive(Clone, Copy, Debug)]
pub struct ZeroOrOne;

#[derive(Clone, Copy, Debug)]
pub struct All;

impl Cardinality for One {
    type Output<T> = T;

    fn reduce<T>(rows: Vec<T>) -> Result<T, CardinalityError> {
        let count = rows.len();
        let mut rows = rows.into_iter();
        match (rows.next(), count) {
            (Some(row), 1) => Ok(row),
            (None, _) => Err(CardinalityError::NoRows),
            (Some(_), count) => Err(CardinalityError::TooManyRows(count)),
        }
    }
}

impl Cardinality for ZeroOrOne {
    type Output<T> = Option<T>;

    /// More than one row yields `None`, the same as no rows. Uniqueness has to
    /// be enforced in SQL (`LIMIT 1`, unique constraints).
    fn reduce<T>(rows: Vec<T>) -> Result<Option<T>, CardinalityError> {
        if rows.len() != 1 {
            return Ok(None);
        }
        Ok(rows.into_iter().next())
    }
}

impl Cardinality for All {
    type Output<T> = Vec<T>;

    fn reduce<T>(rows: Vec<T>) -> Result<Vec<T>, CardinalityError> {
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::{All, Cardinality, CardinalityError, One, ZeroOrOne};
    use crate::ResultSet;

    #[test]
    fn one_requires_exactly_one_row() {
        assert_eq!(One::reduce::<i64>(vec![]), Err(CardinalityError::NoRows));
        assert_eq!(One::reduce(vec![7]), Ok(7));
        assert_eq!(
            One::reduce(vec![7, 8]),
            Err(CardinalityError::TooManyRows(2))
        );
    }

    #[test]
    fn zero_or_one_treats_many_rows_as_absent() {
        assert_eq!(ZeroOrOne::reduce::<i64>(vec![]), Ok(None));
        assert_eq!(ZeroOrOne::reduce(vec![7]), Ok(Some(7)));
        assert_eq!(ZeroOrOne::reduce(vec![7, 8]), Ok(None));
    }

    #[test]
    fn all_keeps_engine_order() {
        assert_eq!(All::reduce(vec![3, 1, 2]), Ok(vec![3, 1, 2]));
        assert_eq!(All::reduce::<i64>(vec![]), Ok(vec![]));
    }

    #[test]
    fn reduce_result_passes_metadata_through() {
        let result = ResultSet {
            columns: vec![],
            data: vec!["row"],
            affected_row_count: 3,
            last_insert_rowid: Some("42".to_owned()),
        };
        let reduced = One::reduce_result(result).expect("one row");
        assert_eq!(reduced.data, "row");
        assert_eq!(reduced.affected_row_count, 3);
        assert_eq!(reduced.last_insert_rowid.as_deref(), Some("42"));
    }
}
