use std::time::Duration;

use reqwest::{
    header::{self, HeaderValue},
    Method, Url,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{ClientOptions, TransportError};

/// Single-shot JSON-over-HTTP exchange shared by both clients.
///
/// Sends exactly one request per call; timeouts come from [`ClientOptions`]
/// and nothing is retried.
#[derive(Clone, Debug)]
pub(crate) struct HttpTransport {
    http: reqwest::Client,
    options: ClientOptions,
}

/// Body of a 2xx response.
#[derive(Debug)]
pub(crate) struct HttpResponse {
    pub body: String,
}

impl HttpResponse {
    pub(crate) fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(|err| {
            TransportError::BadBody(format!("{err}; body: {}", self.body))
        })
    }
}

impl HttpTransport {
    pub(crate) fn new(options: ClientOptions) -> Self {
        Self {
            http: reqwest::Client::new(),
            options,
        }
    }

    pub(crate) fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub(crate) fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    pub(crate) fn parse_url(url: &str) -> Result<Url, TransportError> {
        Url::parse(url).map_err(|err| TransportError::BadUrl(format!("'{url}': {err}")))
    }

    /// Sends one request. Non-2xx statuses come back as
    /// [`TransportError::BadStatus`] with the raw body.
    pub(crate) async fn send<B>(
        &self,
        method: Method,
        url: Url,
        authorization: &str,
        body: Option<&B>,
    ) -> Result<HttpResponse, TransportError>
    where
        B: Serialize + ?Sized,
    {
        let mut authorization = HeaderValue::from_str(authorization)
            .map_err(|err| TransportError::BadHeaders(format!("authorization: {err}")))?;
        authorization.set_sensitive(true);
        let user_agent = HeaderValue::from_str(&self.options.user_agent)
            .map_err(|err| TransportError::BadHeaders(format!("user-agent: {err}")))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%method, %url, "sending request");

        // On WASM, reqwest uses AbortController for the timeout; `.timeout()`
        // is available on both targets.
        let mut request = self
            .http
            .request(method, url)
            .header(header::AUTHORIZATION, authorization)
            .header(header::USER_AGENT, user_agent)
            .timeout(Duration::from_millis(self.options.timeout_ms));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(status = status.as_u16(), body_len = body.len(), "received response");

        if !status.is_success() {
            return Err(TransportError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(HttpResponse { body })
    }
}

/// Accepts tokens with or without a `Bearer ` prefix.
pub(crate) fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
