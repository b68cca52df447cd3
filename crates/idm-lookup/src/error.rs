//! Error type for `idm-lookup`.

use thiserror::Error;

/// Fixed text returned when no upstream URL is configured.
pub const MSG_IDM_URL_NOT_SET: &str = "IDM_URL environment variable not set.";

/// Fixed text returned when the configured credential cannot be sent.
pub const MSG_IDM_TOKEN_INVALID: &str = "IDM_TOKEN is not a valid header value.";

#[derive(Debug, Error)]
pub enum Error {
  /// No upstream URL configured; no request was attempted.
  #[error("IDM_URL environment variable not set.")]
  NotConfigured,

  /// The configured upstream URL is not an absolute URL.
  #[error("invalid IDM_URL {url:?}: {reason}")]
  InvalidUrl { url: String, reason: String },

  /// The configured credential is not a valid `Authorization` header value.
  #[error("IDM_TOKEN is not a valid header value.")]
  InvalidCredential,

  #[error("failed to build HTTP client: {0}")]
  ClientBuild(#[source] reqwest::Error),

  /// The upstream could not be reached or its response could not be read.
  #[error("upstream unavailable: {0}")]
  Unavailable(#[source] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
