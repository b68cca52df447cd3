//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unprocessable entity: {0}")]
  Unprocessable(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// Server-side misconfiguration. Answered as plain text, verbatim.
  #[error("{0}")]
  Config(String),

  #[error("bad gateway: {0}")]
  BadGateway(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<idm_core::Error> for ApiError {
  fn from(e: idm_core::Error) -> Self {
    use idm_core::Error as E;
    match e {
      E::Validation(m) => ApiError::Unprocessable(m),
      E::NotFound(id) => ApiError::NotFound(format!("contract {id} not found")),
      e @ E::Conflict(_) => ApiError::Conflict(e.to_string()),
      E::Query(m) => ApiError::BadRequest(m),
      e @ E::InvalidTenant(_) => ApiError::BadRequest(e.to_string()),
      E::Storage(inner) => ApiError::Store(inner),
    }
  }
}

impl From<idm_lookup::Error> for ApiError {
  fn from(e: idm_lookup::Error) -> Self {
    use idm_lookup::Error as E;
    match e {
      E::NotConfigured => ApiError::Config(idm_lookup::error::MSG_IDM_URL_NOT_SET.to_owned()),
      e @ E::InvalidUrl { .. } => ApiError::BadRequest(e.to_string()),
      E::InvalidCredential => {
        ApiError::Config(idm_lookup::error::MSG_IDM_TOKEN_INVALID.to_owned())
      }
      e @ E::ClientBuild(_) => ApiError::Store(Box::new(e)),
      e @ E::Unavailable(_) => ApiError::BadGateway(e.to_string()),
    }
  }
}

/// Map a backend error through the core taxonomy.
pub(crate) fn store_err<E: Into<idm_core::Error>>(e: E) -> ApiError {
  ApiError::from(e.into())
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Config(m) => {
        tracing::warn!(error = %m, "request failed on server configuration");
        return (StatusCode::INTERNAL_SERVER_ERROR, m.clone()).into_response();
      }
      ApiError::BadGateway(m) => {
        tracing::warn!(error = %m, "upstream request failed");
        (StatusCode::BAD_GATEWAY, m.clone())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "storage failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal storage error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
