//! `GET /idm-connect/searchidm`: relay a person lookup to the IDM.
//!
//! Query parameters `firstName`, `lastName` and `dateOfBirth` are all
//! optional. The upstream status, `Content-Type` and body are passed back
//! unchanged; no tenant header is required.

use axum::{
  extract::{Query, State},
  http::header,
  response::{IntoResponse, Response},
};
use idm_core::store::ContractStore;
use idm_lookup::{LookupQuery, RelayedResponse};

use crate::{AppState, error::ApiError};

/// `GET /idm-connect/searchidm[?firstName=&lastName=&dateOfBirth=]`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(query): Query<LookupQuery>,
) -> Result<Response, ApiError>
where
  S: ContractStore,
{
  let relayed = state.lookup.search(&query).await?;
  Ok(relay(relayed))
}

fn relay(relayed: RelayedResponse) -> Response {
  let RelayedResponse { status, content_type, body } = relayed;
  let mut response = (status, body).into_response();
  // `Bytes` bodies default to application/octet-stream.
  let headers = response.headers_mut();
  headers.remove(header::CONTENT_TYPE);
  if let Some(content_type) = content_type {
    headers.insert(header::CONTENT_TYPE, content_type);
  }
  response
}
