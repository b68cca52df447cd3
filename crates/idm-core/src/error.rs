//! Error types for `idm-core`.
//!
//! Every storage backend converts its own failures into this taxonomy so the
//! HTTP layer can map them to status codes without knowing the backend.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("contract not found: {0}")]
  NotFound(Uuid),

  #[error("contract {0} already exists")]
  Conflict(Uuid),

  #[error("invalid query: {0}")]
  Query(String),

  #[error("invalid tenant identifier: {0:?}")]
  InvalidTenant(String),

  /// Backend failure. The message is for logs, not for callers.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
