//! Async HTTP client for the IDM search endpoint.

use bytes::Bytes;
use reqwest::{
  Client, StatusCode, Url,
  header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
use serde::Deserialize;

use crate::{Error, LookupQuery, Result};

/// Upstream connection settings, read once at process start.
///
/// Both values are optional here: a missing URL is reported per request, and
/// a missing token simply omits the `Authorization` header.
#[derive(Clone, Default, Deserialize)]
pub struct LookupConfig {
  /// Absolute URL of the IDM search endpoint (`IDM_URL`).
  pub url:   Option<String>,
  /// Sent verbatim as the `Authorization` header (`IDM_TOKEN`).
  pub token: Option<String>,
}

impl std::fmt::Debug for LookupConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LookupConfig")
      .field("url", &self.url)
      .field("token", &self.token.as_ref().map(|_| "<redacted>"))
      .finish()
  }
}

/// The upstream answer, passed through without interpretation.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
  pub status:       StatusCode,
  /// Only set when the upstream sent a `Content-Type` header.
  pub content_type: Option<HeaderValue>,
  pub body:         Bytes,
}

/// Client for the IDM search endpoint.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct IdmClient {
  client: Client,
  config: LookupConfig,
}

impl IdmClient {
  /// Build a client with reqwest's default timeout policy.
  pub fn new(config: LookupConfig) -> Result<Self> {
    let client = Client::builder().build().map_err(Error::ClientBuild)?;
    Ok(Self::with_client(client, config))
  }

  /// Use an existing [`reqwest::Client`] (and its connection pool).
  pub fn with_client(client: Client, config: LookupConfig) -> Self {
    Self { client, config }
  }

  fn upstream_url(&self) -> Result<Url> {
    let raw = self.config.url.as_deref().ok_or(Error::NotConfigured)?;
    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl {
      url:    raw.to_owned(),
      reason: e.to_string(),
    })?;
    match url.scheme() {
      "http" | "https" => Ok(url),
      other => Err(Error::InvalidUrl {
        url:    raw.to_owned(),
        reason: format!("unsupported scheme {other:?}"),
      }),
    }
  }

  /// Forward `query` to the IDM and relay whatever it answers.
  ///
  /// Every HTTP response is returned as `Ok`, whatever its status. Only
  /// configuration problems (checked before any I/O) and transport failures
  /// are errors. Dropping the returned future aborts the outbound request.
  pub async fn search(&self, query: &LookupQuery) -> Result<RelayedResponse> {
    let url = self.upstream_url()?;
    let params = query.upstream_params();

    let mut request = self.client.get(url.clone()).query(&params);
    if let Some(token) = &self.config.token {
      let value = HeaderValue::from_str(token).map_err(|_| Error::InvalidCredential)?;
      request = request.header(AUTHORIZATION, value);
    }

    tracing::debug!(
      %url,
      params = params.len(),
      authorized = self.config.token.is_some(),
      "forwarding IDM search"
    );

    let response = request.send().await.map_err(Error::Unavailable)?;
    let status = response.status();
    let content_type = response.headers().get(CONTENT_TYPE).cloned();
    let body = response.bytes().await.map_err(Error::Unavailable)?;

    tracing::debug!(%status, bytes = body.len(), "IDM search answered");
    Ok(RelayedResponse { status, content_type, body })
  }
}
