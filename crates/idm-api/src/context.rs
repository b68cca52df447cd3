//! Request context extractor.
//!
//! The gateway in front of the service forwards tenant and user identity as
//! `x-okapi-*` headers. Handlers that touch tenant data take a
//! [`RequestContext`]; a request without a tenant is rejected with 400.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use idm_core::context::{Actor, Tenant};
use uuid::Uuid;

use crate::error::ApiError;

pub const TENANT_HEADER: &str = "x-okapi-tenant";
pub const USER_ID_HEADER: &str = "x-okapi-user-id";
pub const USERNAME_HEADER: &str = "x-okapi-username";

/// Tenant and acting user of the current request.
#[derive(Debug, Clone)]
pub struct RequestContext {
  pub tenant: Tenant,
  pub actor:  Actor,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|s| !s.is_empty())
}

impl RequestContext {
  pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
    let tenant = header_str(headers, TENANT_HEADER)
      .ok_or_else(|| ApiError::BadRequest(format!("missing {TENANT_HEADER} header")))?;
    let tenant = Tenant::new(tenant)?;

    let user_id = header_str(headers, USER_ID_HEADER)
      .map(|raw| {
        Uuid::parse_str(raw)
          .map_err(|_| ApiError::BadRequest(format!("invalid {USER_ID_HEADER}: {raw:?}")))
      })
      .transpose()?;
    let username = header_str(headers, USERNAME_HEADER).map(str::to_owned);

    Ok(Self { tenant, actor: Actor { user_id, username } })
  }
}

impl<St> FromRequestParts<St> for RequestContext
where
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &St,
  ) -> Result<Self, Self::Rejection> {
    Self::from_headers(&parts.headers)
  }
}
