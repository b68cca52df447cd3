//! Error type for `idm-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] idm_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for idm_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => idm_core::Error::Storage(Box::new(other)),
    }
  }
}
