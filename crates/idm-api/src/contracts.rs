//! Handlers for `/idm-connect/contract` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/idm-connect/contract` | `?query=&offset=&limit=` (limit defaults to 10) |
//! | `POST`   | `/idm-connect/contract` | 201, `Location` header, stored record as body |
//! | `GET`    | `/idm-connect/contract/{id}` | 404 if not found |
//! | `PUT`    | `/idm-connect/contract/{id}` | 204; body `id` must match path |
//! | `DELETE` | `/idm-connect/contract/{id}` | 204 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use idm_core::{
  contract::Contract,
  store::{ContractPage, ContractQuery, ContractStore, DEFAULT_LIMIT},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState, CONTRACTS_PATH,
  context::RequestContext,
  error::{ApiError, store_err},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Filter expression; see `idm_store_sqlite::filter` for the dialect.
  pub query:  Option<String>,
  #[serde(default)]
  pub offset: usize,
  #[serde(default = "default_limit")]
  pub limit:  usize,
}

fn default_limit() -> usize { DEFAULT_LIMIT }

/// `GET /idm-connect/contract[?query=&offset=&limit=]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  ctx: RequestContext,
  Query(params): Query<ListParams>,
) -> Result<Json<ContractPage>, ApiError>
where
  S: ContractStore,
{
  let query = ContractQuery {
    filter: params.query,
    offset: params.offset,
    limit:  params.limit,
  };
  let page = state.store.list(ctx.tenant, query).await.map_err(store_err)?;
  Ok(Json(page))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /idm-connect/contract`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  ctx: RequestContext,
  Json(contract): Json<Contract>,
) -> Result<Response, ApiError>
where
  S: ContractStore,
{
  let tenant = ctx.tenant.clone();
  let created = state
    .store
    .create(ctx.tenant, ctx.actor, contract)
    .await
    .map_err(store_err)?;

  tracing::info!(%tenant, id = ?created.id, "contract created");

  let location = created
    .id
    .and_then(|id| HeaderValue::try_from(format!("{CONTRACTS_PATH}/{id}")).ok());
  let mut response = (StatusCode::CREATED, Json(created)).into_response();
  if let Some(location) = location {
    response.headers_mut().insert(header::LOCATION, location);
  }
  Ok(response)
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /idm-connect/contract/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  ctx: RequestContext,
  Path(id): Path<Uuid>,
) -> Result<Json<Contract>, ApiError>
where
  S: ContractStore,
{
  let contract = state
    .store
    .get(ctx.tenant, id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("contract {id} not found")))?;
  Ok(Json(contract))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /idm-connect/contract/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  ctx: RequestContext,
  Path(id): Path<Uuid>,
  Json(contract): Json<Contract>,
) -> Result<StatusCode, ApiError>
where
  S: ContractStore,
{
  let tenant = ctx.tenant.clone();
  state
    .store
    .update(ctx.tenant, ctx.actor, id, contract)
    .await
    .map_err(store_err)?;

  tracing::info!(%tenant, %id, "contract updated");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /idm-connect/contract/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  ctx: RequestContext,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ContractStore,
{
  let tenant = ctx.tenant.clone();
  state.store.delete(ctx.tenant, id).await.map_err(store_err)?;

  tracing::info!(%tenant, %id, "contract deleted");
  Ok(StatusCode::NO_CONTENT)
}
