//! `turso-http` is a typed async HTTP client for two services:
//!
//! - the SQL pipeline endpoint (`/v2/pipeline`) of a hosted database, through
//!   [`SqlClient`];
//! - the platform REST API (databases, groups, API tokens), through
//!   [`PlatformClient`].
//!
//! Queries pair SQL with named parameters built by [`encode`] and a
//! [`RowDecoder`] built from [`decode`]. The calling method picks how rows
//! are reduced:
//! - [`SqlClient::query_one`]: exactly one row
//! - [`SqlClient::query_optional`]: zero or one row
//! - [`SqlClient::query_all`]: every row
//!
//! ```no_run
//! use turso_http::{decode, encode, Query, SqlClient};
//!
//! # async fn run() -> turso_http::Result<()> {
//! let db = SqlClient::new("https://app-acme.turso.io/v2/pipeline", "db-token");
//! let name = db
//!     .query_one(Query::new(
//!         "SELECT name FROM users WHERE id = :id",
//!         [encode::int("id", 1234)],
//!         decode::string("name"),
//!     ))
//!     .await?
//!     .data;
//! println!("{name}");
//! # Ok(())
//! # }
//! ```

mod client;
mod endpoint;
mod error;
mod options;
mod param;
mod statement;
mod transport;
mod types;
mod wire;

pub mod cardinality;
pub mod decode;
pub mod encode;
pub mod pipeline;
pub mod platform;

pub use cardinality::{All, Cardinality, CardinalityError, One, ZeroOrOne};
pub use client::SqlClient;
pub use decode::{DecodeError, RowDecoder};
pub use endpoint::{pipeline_url_from_database_url, DatabaseUrl, Scheme, DEFAULT_DATABASE_HOST};
pub use error::{ConfigError, SqlError, TransportError, TursoError};
pub use options::ClientOptions;
pub use param::{Param, WireType};
pub use platform::{PlatformClient, PlatformError};
pub use statement::{Query, Statement};
pub use types::{BatchResult, Column, ExecResult, ResultSet, StatementOutcome};

pub type Result<T> = std::result::Result<T, TursoError>;

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn env_var(name: &'static str) -> std::result::Result<String, ConfigError> {
    let value = std::env::var(name).map_err(|_| ConfigError::Missing(name))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(value)
}
