use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{map_status, PlatformClient, PlatformError};

/// Database as listed by the platform API.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Database {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "DbId")]
    pub id: String,
    #[serde(rename = "Hostname")]
    pub hostname: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default, rename = "primaryRegion")]
    pub primary_region: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub is_schema: bool,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub block_reads: bool,
    #[serde(default)]
    pub block_writes: bool,
    #[serde(default)]
    pub allow_attach: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub sleeping: bool,
}

/// Body of a create-database request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateDatabase {
    pub name: String,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<Seed>,
    /// Maximum size, e.g. `"256mb"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_schema: bool,
    /// Parent schema database for a child database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl CreateDatabase {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            seed: None,
            size_limit: None,
            is_schema: false,
            schema: None,
        }
    }
}

/// Initial content of a new database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Seed {
    /// Copy of an existing database, optionally at a point in time (RFC 3339).
    Database {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
    },
    /// SQL dump fetched from a URL.
    Dump { url: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedDatabase {
    #[serde(rename = "DbId")]
    pub id: String,
    #[serde(rename = "Hostname")]
    pub hostname: String,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Usage {
    pub rows_read: u64,
    pub rows_written: u64,
    pub storage_bytes: u64,
    pub bytes_synced: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct InstanceUsage {
    pub uuid: String,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DatabaseUsage {
    pub uuid: String,
    #[serde(default)]
    pub instances: Vec<InstanceUsage>,
    #[serde(default)]
    pub total: Usage,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct QueryStats {
    pub query: String,
    #[serde(default)]
    pub rows_read: u64,
    #[serde(default)]
    pub rows_written: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DatabaseStats {
    #[serde(default)]
    pub top_queries: Vec<QueryStats>,
}

/// Access level granted by a database token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenAuthorization {
    #[default]
    FullAccess,
    ReadOnly,
}

impl TokenAuthorization {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullAccess => "full-access",
            Self::ReadOnly => "read-only",
        }
    }
}

/// Parameters of a database token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenOptions {
    /// Lifetime such as `"2w1d30m"`, or `"never"`.
    pub expiration: String,
    pub authorization: TokenAuthorization,
}

impl Default for TokenOptions {
    fn default() -> Self {
        Self {
            expiration: "never".to_owned(),
            authorization: TokenAuthorization::FullAccess,
        }
    }
}

#[derive(Deserialize)]
struct DatabaseList {
    databases: Vec<Database>,
}

#[derive(Deserialize)]
struct DatabaseEnvelope<T> {
    database: T,
}

#[derive(Deserialize)]
struct Jwt {
    jwt: String,
}

impl PlatformClient {
    /// `GET /v1/organizations/{org}/databases`
    pub async fn list_databases(&self) -> Result<Vec<Database>, PlatformError> {
        let url = self.org_endpoint(&["databases"])?;
        let list: DatabaseList = self.get(url).await?;
        Ok(list.databases)
    }

    /// `GET /v1/organizations/{org}/databases/{name}`
    pub async fn retrieve_database(&self, name: &str) -> Result<Database, PlatformError> {
        let url = self.org_endpoint(&["databases", name])?;
        let envelope = map_status(
            self.get::<DatabaseEnvelope<Database>>(url).await,
            database_not_found(name),
        )?;
        Ok(envelope.database)
    }

    /// `POST /v1/organizations/{org}/databases`
    ///
    /// 409 maps to [`PlatformError::DatabaseAlreadyExists`], 400 to
    /// [`PlatformError::InvalidDatabaseRequest`].
    pub async fn create_database(
        &self,
        request: &CreateDatabase,
    ) -> Result<CreatedDatabase, PlatformError> {
        let url = self.org_endpoint(&["databases"])?;
        let result = self
            .request::<_, DatabaseEnvelope<CreatedDatabase>>(Method::POST, url, Some(request))
            .await;
        let envelope = map_status(result, |status| match status {
            409 => Some(PlatformError::DatabaseAlreadyExists(request.name.clone())),
            400 => Some(PlatformError::InvalidDatabaseRequest(request.name.clone())),
            _ => None,
        })?;
        Ok(envelope.database)
    }

    /// `DELETE /v1/organizations/{org}/databases/{name}`
    ///
    /// Returns the name of the deleted database.
    pub async fn delete_database(&self, name: &str) -> Result<String, PlatformError> {
        let url = self.org_endpoint(&["databases", name])?;
        let envelope = map_status(
            self.delete::<DatabaseEnvelope<String>>(url).await,
            database_not_found(name),
        )?;
        Ok(envelope.database)
    }

    /// `GET /v1/organizations/{org}/databases/{name}/usage`
    pub async fn database_usage(&self, name: &str) -> Result<DatabaseUsage, PlatformError> {
        let url = self.org_endpoint(&["databases", name, "usage"])?;
        let envelope = map_status(
            self.get::<DatabaseEnvelope<DatabaseUsage>>(url).await,
            database_not_found(name),
        )?;
        Ok(envelope.database)
    }

    /// `GET /v1/organizations/{org}/databases/{name}/stats`
    pub async fn database_stats(&self, name: &str) -> Result<DatabaseStats, PlatformError> {
        let url = self.org_endpoint(&["databases", name, "stats"])?;
        map_status(self.get(url).await, database_not_found(name))
    }

    /// `POST /v1/organizations/{org}/databases/{name}/auth/tokens`
    ///
    /// Returns the signed database token.
    pub async fn create_database_token(
        &self,
        name: &str,
        options: &TokenOptions,
    ) -> Result<String, PlatformError> {
        let mut url = self.org_endpoint(&["databases", name, "auth", "tokens"])?;
        url.query_pairs_mut()
            .append_pair("expiration", &options.expiration)
            .append_pair("authorization", options.authorization.as_str());
        let jwt = map_status(
            self.request::<(), Jwt>(Method::POST, url, None).await,
            database_not_found(name),
        )?;
        Ok(jwt.jwt)
    }

    /// `POST /v1/organizations/{org}/databases/{name}/auth/rotate`
    ///
    /// Invalidates every token issued for the database.
    pub async fn invalidate_database_tokens(&self, name: &str) -> Result<(), PlatformError> {
        let url = self.org_endpoint(&["databases", name, "auth", "rotate"])?;
        map_status(
            self.request_discarding_body(Method::POST, url).await,
            database_not_found(name),
        )
    }
}

impl<'de> Deserialize<'de> for Usage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Counters may be absent or null for idle databases.
        #[derive(Deserialize)]
        struct Raw {
            rows_read: Option<u64>,
            rows_written: Option<u64>,
            storage_bytes: Option<u64>,
            bytes_synced: Option<u64>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Self {
            rows_read: raw.rows_read.unwrap_or_default(),
            rows_written: raw.rows_written.unwrap_or_default(),
            storage_bytes: raw.storage_bytes.unwrap_or_default(),
            bytes_synced: raw.bytes_synced.unwrap_or_default(),
        })
    }
}

fn database_not_found(name: &str) -> impl FnOnce(u16) -> Option<PlatformError> + '_ {
    move |status| (status == 404).then(|| PlatformError::DatabaseNotFound(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CreateDatabase, Database, DatabaseUsage, Seed, TokenAuthorization};

    #[test]
    fn database_uses_platform_field_names() {
        let db: Database = serde_json::from_value(json!({
            "Name": "app",
            "DbId": "0eb7-4c52",
            "Hostname": "app-acme.turso.io",
            "group": "default",
            "regions": ["fra"],
            "primaryRegion": "fra",
            "type": "logical",
            "block_reads": false
        }))
        .expect("must decode");
        assert_eq!(db.name, "app");
        assert_eq!(db.primary_region.as_deref(), Some("fra"));
        assert_eq!(db.kind.as_deref(), Some("logical"));
        assert!(!db.sleeping);
    }

    #[test]
    fn create_request_skips_unset_fields() {
        let mut request = CreateDatabase::new("app", "default");
        request.seed = Some(Seed::Database {
            name: "template".to_owned(),
            timestamp: None,
        });
        assert_eq!(
            serde_json::to_value(&request).expect("must serialize"),
            json!({
                "name": "app",
                "group": "default",
                "seed": { "type": "database", "name": "template" }
            })
        );
    }

    #[test]
    fn usage_tolerates_null_counters() {
        let usage: DatabaseUsage = serde_json::from_value(json!({
            "uuid": "u-1",
            "instances": [{ "uuid": "i-1", "usage": { "rows_read": 5, "rows_written": null } }],
            "total": { "rows_read": 5, "storage_bytes": 4096 }
        }))
        .expect("must decode");
        assert_eq!(usage.instances[0].usage.rows_read, 5);
        assert_eq!(usage.instances[0].usage.rows_written, 0);
        assert_eq!(usage.total.storage_bytes, 4096);
    }

    #[test]
    fn token_authorization_query_values() {
        assert_eq!(TokenAuthorization::FullAccess.as_str(), "full-access");
        assert_eq!(TokenAuthorization::ReadOnly.as_str(), "read-only");
    }
}
