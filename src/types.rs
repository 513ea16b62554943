use crate::SqlError;

/// Result column as advertised by the engine.
///
/// `decltype` is informational; decoding is keyed by name only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub decltype: Option<String>,
}

/// Successful statement result with its rows shaped as `R`.
///
/// `R` is `Vec<T>`, `T` or `Option<T>` depending on the cardinality the
/// caller asked for, and `()` for plain statements.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultSet<R> {
    pub columns: Vec<Column>,
    pub data: R,
    pub affected_row_count: u64,
    pub last_insert_rowid: Option<String>,
}

impl<R> ResultSet<R> {
    /// Replaces the row data, keeping columns and execution metadata.
    pub fn map<S>(self, f: impl FnOnce(R) -> S) -> ResultSet<S> {
        ResultSet {
            columns: self.columns,
            data: f(self.data),
            affected_row_count: self.affected_row_count,
            last_insert_rowid: self.last_insert_rowid,
        }
    }

    pub(crate) fn try_map<S, E>(self, f: impl FnOnce(R) -> Result<S, E>) -> Result<ResultSet<S>, E> {
        Ok(ResultSet {
            columns: self.columns,
            data: f(self.data)?,
            affected_row_count: self.affected_row_count,
            last_insert_rowid: self.last_insert_rowid,
        })
    }
}

/// Execution metadata of a statement that returns no data.
pub type ExecResult = ResultSet<()>;

/// Outcome of one statement inside a pipeline request.
#[derive(Clone, Debug, PartialEq)]
pub enum StatementOutcome<R> {
    Success(ResultSet<R>),
    Failed {
        request_index: usize,
        error: SqlError,
        /// Error message text from the engine.
        message: String,
    },
}

impl<R> StatementOutcome<R> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts into a `Result`, consuming the outcome.
    pub fn into_result(self) -> Result<ResultSet<R>, SqlError> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Maps the row data of a successful outcome.
    pub fn map<S>(self, f: impl FnOnce(R) -> S) -> StatementOutcome<S> {
        match self {
            Self::Success(result) => StatementOutcome::Success(result.map(f)),
            Self::Failed {
                request_index,
                error,
                message,
            } => StatementOutcome::Failed {
                request_index,
                error,
                message,
            },
        }
    }

    pub(crate) fn try_map_result<S, E>(
        self,
        f: impl FnOnce(ResultSet<R>) -> Result<ResultSet<S>, E>,
    ) -> Result<StatementOutcome<S>, E> {
        match self {
            Self::Success(result) => f(result).map(StatementOutcome::Success),
            Self::Failed {
                request_index,
                error,
                message,
            } => Ok(StatementOutcome::Failed {
                request_index,
                error,
                message,
            }),
        }
    }
}

/// All outcomes of one pipeline request, in request order.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchResult<R> {
    /// Session baton returned by the server. It is never sent back, so every
    /// request runs in a fresh stream.
    pub baton: Option<String>,
    pub base_url: Option<String>,
    pub outcomes: Vec<StatementOutcome<R>>,
}
