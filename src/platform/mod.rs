//! Platform REST API: databases, groups and API tokens.
//!
//! Each operation is one authenticated request. A few HTTP statuses map to
//! named errors per operation (for example 404 on a database lookup becomes
//! [`PlatformError::DatabaseNotFound`]); every other failure is returned as
//! [`PlatformError::Transport`]. Only the status code is inspected.

mod databases;
mod groups;
mod tokens;

use std::fmt;

use reqwest::{Method, Url};
use serde::{de::DeserializeOwned, Serialize};

pub use databases::{
    CreateDatabase, CreatedDatabase, Database, DatabaseStats, DatabaseUsage, InstanceUsage,
    QueryStats, Seed, TokenAuthorization, TokenOptions, Usage,
};
pub use groups::{CreateGroup, Group, GroupConfiguration};
pub use tokens::{ApiToken, CreatedApiToken, TokenValidation};

use crate::{
    transport::{normalize_bearer_authorization, HttpTransport},
    ClientOptions, ConfigError, TransportError,
};

/// Default base URL of the platform API.
pub const DEFAULT_API_URL: &str = "https://api.turso.tech";

/// Error type returned by [`PlatformClient`].
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("database '{0}' not found")]
    DatabaseNotFound(String),
    #[error("database '{0}' already exists")]
    DatabaseAlreadyExists(String),
    #[error("invalid request for database '{0}'")]
    InvalidDatabaseRequest(String),
    #[error("group '{0}' not found")]
    GroupNotFound(String),
    #[error("group '{0}' already exists")]
    GroupAlreadyExists(String),
    #[error("invalid request for group '{0}'")]
    InvalidGroupRequest(String),
    #[error("api token '{0}' not found")]
    TokenNotFound(String),
    #[error("api token '{0}' already exists")]
    TokenAlreadyExists(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Clone)]
/// HTTP client for the platform REST API of one organization.
pub struct PlatformClient {
    transport: HttpTransport,
    base_url: String,
    organization: String,
    authorization: String,
}

impl fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformClient")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("authorization", &"<redacted>")
            .field("options", self.transport.options())
            .finish()
    }
}

impl PlatformClient {
    /// Creates a client for `organization` using a platform API token.
    ///
    /// If the token is missing the `Bearer ` prefix, it is added automatically.
    pub fn new(organization: impl Into<String>, token: impl AsRef<str>) -> Self {
        Self {
            transport: HttpTransport::new(ClientOptions::default()),
            base_url: DEFAULT_API_URL.to_owned(),
            organization: organization.into(),
            authorization: normalize_bearer_authorization(token.as_ref()),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `TURSO_ORG`: organization slug
    /// - `TURSO_API_TOKEN`: platform API token
    /// - `TURSO_API_URL`: optional, defaults to [`DEFAULT_API_URL`]
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        let organization = crate::env_var("TURSO_ORG")?;
        let token = crate::env_var("TURSO_API_TOKEN")?;
        let client = Self::new(organization, token);
        Ok(match crate::env_var("TURSO_API_URL") {
            Ok(base_url) => client.with_base_url(base_url),
            Err(_) => client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Applies client options such as the request timeout.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.transport = self.transport.with_options(opts);
        self
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = HttpTransport::parse_url(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| {
                TransportError::BadUrl(format!("'{}' cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Endpoint under `/v1/organizations/{org}/`.
    fn org_endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut path = vec!["v1", "organizations", self.organization.as_str()];
        path.extend_from_slice(segments);
        self.endpoint(&path)
    }

    async fn request<B, R>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<R, TransportError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.transport
            .send(method, url, &self.authorization, body)
            .await?
            .json()
    }

    /// Sends a request whose success body carries nothing of interest.
    async fn request_discarding_body(&self, method: Method, url: Url) -> Result<(), TransportError> {
        self.transport
            .send::<()>(method, url, &self.authorization, None)
            .await
            .map(|_| ())
    }

    async fn get<R: DeserializeOwned>(&self, url: Url) -> Result<R, TransportError> {
        self.request::<(), R>(Method::GET, url, None).await
    }

    async fn delete<R: DeserializeOwned>(&self, url: Url) -> Result<R, TransportError> {
        self.request::<(), R>(Method::DELETE, url, None).await
    }
}

/// Converts selected HTTP statuses into named errors.
fn map_status<T>(
    result: Result<T, TransportError>,
    classify: impl FnOnce(u16) -> Option<PlatformError>,
) -> Result<T, PlatformError> {
    result.map_err(|err| match err.status().and_then(classify) {
        Some(mapped) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(status = ?err.status(), error = %mapped, "mapped http status");
            mapped
        }
        None => PlatformError::Transport(err),
    })
}
