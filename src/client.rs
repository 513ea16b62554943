use std::fmt;

use reqwest::Method;

use crate::{
    cardinality::{All, Cardinality, One, ZeroOrOne},
    decode::{Row, RowDecoder},
    endpoint::{pipeline_url_from_database_url, DatabaseUrl},
    pipeline::{self, build_execute_statement},
    transport::{normalize_bearer_authorization, HttpTransport},
    wire::{PipelineRequest, Request},
    BatchResult, ClientOptions, ConfigError, ExecResult, Query, ResultSet, Result, Statement,
    StatementOutcome, TursoError,
};

#[derive(Clone)]
/// HTTP client for the SQL pipeline endpoint of one database.
///
/// Every call is one `POST /v2/pipeline` carrying one or more statements.
/// The session baton returned by the server is never sent back, so calls do
/// not share server-side state.
pub struct SqlClient {
    transport: HttpTransport,
    pipeline_url: String,
    authorization: String,
}

impl fmt::Debug for SqlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlClient")
            .field("pipeline_url", &self.pipeline_url)
            .field("authorization", &"<redacted>")
            .field("options", self.transport.options())
            .finish()
    }
}

impl SqlClient {
    /// Creates a client from a pipeline URL and a bearer token.
    ///
    /// If the token is missing the `Bearer ` prefix, it is added automatically.
    pub fn new(pipeline_url: impl Into<String>, token: impl AsRef<str>) -> Self {
        Self::new_raw_auth(pipeline_url, normalize_bearer_authorization(token.as_ref()))
    }

    /// Creates a client with a full raw authorization value.
    pub fn new_raw_auth(pipeline_url: impl Into<String>, authorization: impl Into<String>) -> Self {
        Self {
            transport: HttpTransport::new(ClientOptions::default()),
            pipeline_url: pipeline_url.into(),
            authorization: authorization.into(),
        }
    }

    /// Creates a client for a hosted database address.
    ///
    /// ```no_run
    /// use turso_http::{DatabaseUrl, SqlClient};
    ///
    /// let db = SqlClient::from_database(&DatabaseUrl::new("app", "acme"), "db-token");
    /// ```
    pub fn from_database(database: &DatabaseUrl, token: impl AsRef<str>) -> Self {
        Self::new(database.pipeline_url(), token)
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `TURSO_DATABASE_URL`: database URL (`libsql://`, `https://` or a
    ///   full pipeline URL)
    /// - `TURSO_AUTH_TOKEN`: database token (Bearer prefix optional)
    ///
    /// **Not available on `wasm32` targets**: environment variables do not
    /// exist in browser runtimes.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        let url = crate::env_var("TURSO_DATABASE_URL")?;
        let token = crate::env_var("TURSO_AUTH_TOKEN")?;
        Ok(Self::new(pipeline_url_from_database_url(&url), token))
    }

    /// Applies client options such as the request timeout.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.transport = self.transport.with_options(opts);
        self
    }

    pub fn pipeline_url(&self) -> &str {
        &self.pipeline_url
    }

    /// Runs a statement and returns its execution metadata.
    pub async fn execute(&self, statement: Statement) -> Result<ExecResult> {
        let outcome = self
            .run_single(&statement.sql, &statement.params, false)
            .await?;
        Ok(outcome.map(|_| ()))
    }

    /// Runs several statements in one pipeline request.
    ///
    /// SQL errors at statement level are returned as
    /// [`StatementOutcome::Failed`] instead of failing the entire batch.
    pub async fn execute_batch<I>(&self, statements: I) -> Result<BatchResult<()>>
    where
        I: IntoIterator<Item = Statement>,
    {
        let statements: Vec<Statement> = statements.into_iter().collect();
        let requests = statements
            .iter()
            .map(|statement| {
                build_execute_statement(&statement.sql, &statement.params, false)
                    .map(|stmt| Request::Execute { stmt })
            })
            .collect::<Result<Vec<_>>>()?;

        let batch = self.send_pipeline(requests).await?;
        let outcomes = batch
            .outcomes
            .into_iter()
            .map(|outcome| outcome.map(|_| ()))
            .collect();

        Ok(BatchResult {
            baton: batch.baton,
            base_url: batch.base_url,
            outcomes,
        })
    }

    /// Runs a query that must return exactly one row.
    pub async fn query_one<T: 'static>(&self, query: Query<T>) -> Result<ResultSet<T>> {
        self.query::<One, T>(query).await
    }

    /// Runs a query returning at most one row of interest.
    ///
    /// More than one row yields `None`, exactly like zero rows; enforce
    /// uniqueness in SQL when it matters.
    pub async fn query_optional<T: 'static>(&self, query: Query<T>) -> Result<ResultSet<Option<T>>> {
        self.query::<ZeroOrOne, T>(query).await
    }

    /// Runs a query and returns every row in engine order.
    pub async fn query_all<T: 'static>(&self, query: Query<T>) -> Result<ResultSet<Vec<T>>> {
        self.query::<All, T>(query).await
    }

    /// Runs a query and reduces its rows with the cardinality `C`.
    ///
    /// A SQL error is returned as [`TursoError::Sql`].
    pub async fn query<C: Cardinality, T: 'static>(
        &self,
        query: Query<T>,
    ) -> Result<ResultSet<C::Output<T>>> {
        let result = self.run_single(&query.sql, &query.params, true).await?;
        let result = pipeline::decode_result_rows(result, &query.decoder, 0)?;
        reduce::<C, T>(result, 0)
    }

    /// Runs several queries in one pipeline request, reducing each
    /// statement's rows with `C` independently.
    pub async fn batch<C: Cardinality, T: 'static>(
        &self,
        queries: Vec<Query<T>>,
    ) -> Result<BatchResult<C::Output<T>>> {
        let requests = queries
            .iter()
            .map(|query| {
                build_execute_statement(&query.sql, &query.params, true)
                    .map(|stmt| Request::Execute { stmt })
            })
            .collect::<Result<Vec<_>>>()?;
        let decoders: Vec<RowDecoder<T>> = queries.into_iter().map(|query| query.decoder).collect();

        let batch = self.send_pipeline(requests).await?;
        let batch = pipeline::decode_batch_rows(batch, &decoders)?;
        let outcomes = batch
            .outcomes
            .into_iter()
            .enumerate()
            .map(|(request_index, outcome)| {
                outcome.try_map_result(|result| reduce::<C, T>(result, request_index))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchResult {
            baton: batch.baton,
            base_url: batch.base_url,
            outcomes,
        })
    }

    pub async fn batch_one<T: 'static>(&self, queries: Vec<Query<T>>) -> Result<BatchResult<T>> {
        self.batch::<One, T>(queries).await
    }

    pub async fn batch_optional<T: 'static>(
        &self,
        queries: Vec<Query<T>>,
    ) -> Result<BatchResult<Option<T>>> {
        self.batch::<ZeroOrOne, T>(queries).await
    }

    pub async fn batch_all<T: 'static>(&self, queries: Vec<Query<T>>) -> Result<BatchResult<Vec<T>>> {
        self.batch::<All, T>(queries).await
    }

    async fn run_single(
        &self,
        sql: &str,
        params: &[crate::Param],
        want_rows: bool,
    ) -> Result<ResultSet<Vec<Row>>> {
        let stmt = build_execute_statement(sql, params, want_rows)?;
        let batch = self.send_pipeline(vec![Request::Execute { stmt }]).await?;

        let outcome = batch
            .outcomes
            .into_iter()
            .next()
            .ok_or_else(|| TursoError::Protocol("missing execute result".to_owned()))?;
        match outcome {
            StatementOutcome::Success(result) => Ok(result),
            StatementOutcome::Failed {
                request_index,
                error,
                message,
            } => Err(TursoError::Sql {
                request_index,
                error,
                message,
            }),
        }
    }

    async fn send_pipeline(&self, requests: Vec<Request>) -> Result<BatchResult<Vec<Row>>> {
        let expected = requests.len();
        let payload = PipelineRequest { requests };
        let url = HttpTransport::parse_url(&self.pipeline_url)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(statements = expected, "sending pipeline request");

        let response = self
            .transport
            .send(Method::POST, url, &self.authorization, Some(&payload))
            .await?;
        let response = pipeline::parse_response(&response.body)?;
        pipeline::decode_outcomes(response, expected)
    }
}

fn reduce<C: Cardinality, T>(
    result: ResultSet<Vec<T>>,
    request_index: usize,
) -> Result<ResultSet<C::Output<T>>> {
    C::reduce_result(result).map_err(|source| TursoError::Cardinality {
        request_index,
        source,
    })
}
