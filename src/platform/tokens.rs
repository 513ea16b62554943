use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;

use super::{map_status, PlatformClient, PlatformError};

/// Platform API token metadata. The token value itself is only returned once,
/// at creation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ApiToken {
    pub name: String,
    pub id: String,
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedApiToken {
    pub name: String,
    pub id: String,
    pub token: String,
}

impl std::fmt::Debug for CreatedApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedApiToken")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenValidation {
    /// Expiry as unix seconds, `-1` for tokens that never expire.
    pub exp: i64,
}

impl TokenValidation {
    /// Expiry instant, `None` if the token does not expire.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.exp < 0 {
            return None;
        }
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Deserialize)]
struct TokenList {
    tokens: Vec<ApiToken>,
}

#[derive(Deserialize)]
struct RevokedToken {
    token: String,
}

impl PlatformClient {
    /// `POST /v1/auth/api-tokens/{name}`
    pub async fn create_api_token(&self, name: &str) -> Result<CreatedApiToken, PlatformError> {
        let url = self.endpoint(&["v1", "auth", "api-tokens", name])?;
        map_status(
            self.request::<(), _>(Method::POST, url, None).await,
            |status| (status == 409).then(|| PlatformError::TokenAlreadyExists(name.to_owned())),
        )
    }

    /// `GET /v1/auth/api-tokens`
    pub async fn list_api_tokens(&self) -> Result<Vec<ApiToken>, PlatformError> {
        let url = self.endpoint(&["v1", "auth", "api-tokens"])?;
        let list: TokenList = self.get(url).await?;
        Ok(list.tokens)
    }

    /// `GET /v1/auth/validate`
    ///
    /// Checks the token this client was built with.
    pub async fn validate_api_token(&self) -> Result<TokenValidation, PlatformError> {
        let url = self.endpoint(&["v1", "auth", "validate"])?;
        Ok(self.get(url).await?)
    }

    /// `DELETE /v1/auth/api-tokens/{name}`
    ///
    /// Returns the name of the revoked token.
    pub async fn revoke_api_token(&self, name: &str) -> Result<String, PlatformError> {
        let url = self.endpoint(&["v1", "auth", "api-tokens", name])?;
        let revoked: RevokedToken = map_status(self.delete(url).await, |status| {
            (status == 404).then(|| PlatformError::TokenNotFound(name.to_owned()))
        })?;
        Ok(revoked.token)
    }
}
