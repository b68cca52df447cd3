//! Request context: who is asking, on behalf of which tenant.
//!
//! The HTTP layer builds these from forwarded headers; stores receive them as
//! plain values.

use uuid::Uuid;

use crate::{Error, Result};

/// An isolated data partition. Identifiers are non-empty ASCII alphanumerics
/// and underscores, e.g. `diku`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tenant(String);

impl Tenant {
  pub fn new(id: impl Into<String>) -> Result<Self> {
    let id = id.into();
    let valid = !id.is_empty()
      && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
      Ok(Self(id))
    } else {
      Err(Error::InvalidTenant(id))
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for Tenant {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// The user on whose behalf a write happens; recorded in contract metadata.
/// Both parts are optional because system calls (e.g. tenant bootstrap) may
/// carry neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
  pub user_id:  Option<Uuid>,
  pub username: Option<String>,
}
