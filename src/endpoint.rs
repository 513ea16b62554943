use std::fmt;

/// Default host suffix of hosted databases.
pub const DEFAULT_DATABASE_HOST: &str = "turso.io";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Https => f.write_str("https"),
        }
    }
}

/// Address of one hosted database.
///
/// Renders as `{scheme}://{database}-{organization}.{location}.{host}`, with
/// the location segment left out when absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseUrl {
    pub scheme: Scheme,
    pub database: String,
    pub organization: String,
    pub location: Option<String>,
    pub host: String,
}

impl DatabaseUrl {
    pub fn new(database: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::Https,
            database: database.into(),
            organization: organization.into(),
            location: None,
            host: DEFAULT_DATABASE_HOST.to_owned(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn hostname(&self) -> String {
        let database = self.database.trim();
        let organization = self.organization.trim();
        match &self.location {
            Some(location) => format!("{database}-{organization}.{location}.{}", self.host),
            None => format!("{database}-{organization}.{}", self.host),
        }
    }

    /// Full URL of the SQL pipeline endpoint.
    ///
    /// Example: `"https://app-acme.fra.turso.io/v2/pipeline"`
    pub fn pipeline_url(&self) -> String {
        format!("{}://{}/v2/pipeline", self.scheme, self.hostname())
    }
}

/// Turns a database URL as handed out by the platform into its pipeline URL.
///
/// `libsql://` and `wss://` become `https://`, `ws://` becomes `http://`, and
/// `/v2/pipeline` is appended unless already present.
pub fn pipeline_url_from_database_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let normalized = if let Some(rest) = trimmed.strip_prefix("libsql://") {
        format!("https://{rest}")
    } else if let Some(rest) = trimmed.strip_prefix("wss://") {
        format!("https://{rest}")
    } else if let Some(rest) = trimmed.strip_prefix("ws://") {
        format!("http://{rest}")
    } else if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    if normalized.ends_with("/v2/pipeline") {
        normalized
    } else {
        format!("{normalized}/v2/pipeline")
    }
}
