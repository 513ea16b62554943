/// Configures per-request HTTP behavior.
///
/// Requests are never retried; a failed call surfaces its error directly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: concat!("turso-http/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}
