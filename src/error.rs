use crate::{cardinality::CardinalityError, decode::DecodeError};

/// Failure of the HTTP exchange itself, before any SQL or REST semantics apply.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    BadStatus { status: u16, body: String },
    /// Request URL could not be built or parsed.
    #[error("bad url: {0}")]
    BadUrl(String),
    /// A request header value was rejected (usually the authorization value).
    #[error("bad headers: {0}")]
    BadHeaders(String),
    /// The response body was not the JSON shape the endpoint promises.
    #[error("unexpected response body: {0}")]
    BadBody(String),
    /// The per-request timeout elapsed.
    #[error("request timed out")]
    Timeout,
    /// Connection could not be established or was dropped.
    #[error("network error: {0}")]
    Network(String),
    #[error("transport error: {0}")]
    Unknown(String),
}

impl TransportError {
    /// Returns the HTTP status for [`TransportError::BadStatus`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        if err.is_builder() {
            return Self::BadUrl(err.to_string());
        }
        if err.is_decode() || err.is_body() {
            return Self::BadBody(err.to_string());
        }
        if is_connect(&err) || err.is_request() {
            return Self::Network(err.to_string());
        }
        Self::Unknown(err.to_string())
    }
}

// is_connect() is not available on wasm32 targets (no TCP)
fn is_connect(err: &reqwest::Error) -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    {
        err.is_connect()
    }
    #[cfg(target_arch = "wasm32")]
    {
        let _ = err;
        false
    }
}

/// SQL-level failure reported by the engine for one statement.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SqlError {
    #[error("SQL parse error")]
    SqlParseError,
    #[error("SQL input error")]
    SqlInputError,
    #[error("more than one SQL statement in a single request")]
    SqlManyStatements,
    #[error("unknown SQLite error")]
    SqliteUnknownError,
    #[error("invalid statement arguments")]
    ArgsInvalid,
    #[error("{0}")]
    Unknown(String),
}

impl SqlError {
    /// Maps an engine error code onto the closed taxonomy.
    ///
    /// Unrecognized codes become [`SqlError::Unknown`] carrying
    /// `"Unknown error: <CODE>"`. When the engine sent no code at all, the
    /// engine message takes the place of the code.
    pub fn classify(code: Option<&str>, message: &str) -> Self {
        match code {
            Some("SQL_PARSE_ERROR") => Self::SqlParseError,
            Some("SQL_INPUT_ERROR") => Self::SqlInputError,
            Some("SQL_MANY_STATEMENTS") => Self::SqlManyStatements,
            Some("SQLITE_UNKNOWN_ERROR") => Self::SqliteUnknownError,
            Some("ARGS_INVALID") => Self::ArgsInvalid,
            Some(other) => Self::Unknown(format!("Unknown error: {other}")),
            None => Self::Unknown(format!("Unknown error: {message}")),
        }
    }
}

/// Error type returned by the SQL pipeline client.
#[derive(Debug, thiserror::Error)]
pub enum TursoError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// SQL error returned for a single-statement call.
    #[error("sql error at request {request_index}: {error} ({message})")]
    Sql {
        /// Index of the failing statement in the pipeline payload.
        request_index: usize,
        error: SqlError,
        /// Error message text from the engine.
        message: String,
    },
    /// Rows came back but could not be decoded with the passed decoder.
    #[error("could not decode row {row_index} of request {request_index} with passed decoder: {source}")]
    RowDecode {
        request_index: usize,
        row_index: usize,
        source: DecodeError,
    },
    /// Row count violated the cardinality the caller asked for.
    #[error("request {request_index}: {source}")]
    Cardinality {
        request_index: usize,
        source: CardinalityError,
    },
    /// Response envelope was valid JSON but broke the pipeline protocol.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Missing or unusable configuration read from the environment.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing {0} environment variable")]
    Missing(&'static str),
    #[error("{0} is set but empty")]
    Empty(&'static str),
}
