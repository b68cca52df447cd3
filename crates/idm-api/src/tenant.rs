//! `POST /_/tenant`: tenant initialisation.
//!
//! Storage is created lazily, so enabling a tenant only matters when the
//! caller asks for sample data with the `loadSample=true` parameter.

use axum::{Json, extract::State, http::StatusCode};
use idm_core::{contract::Contract, store::ContractStore};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  context::RequestContext,
  error::{ApiError, store_err},
};

const SAMPLE_CONTRACTS: &str = include_str!("../data/examplecontracts.json");

/// Body sent by the platform when enabling or upgrading the module.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantAttributes {
  #[serde(default)]
  pub module_to:   Option<String>,
  #[serde(default)]
  pub module_from: Option<String>,
  #[serde(default)]
  pub parameters:  Vec<Parameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
  pub key:   String,
  pub value: String,
}

impl TenantAttributes {
  pub fn load_sample(&self) -> bool {
    self
      .parameters
      .iter()
      .any(|p| p.key == "loadSample" && p.value == "true")
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantResult {
  pub loaded_records: usize,
}

/// The bundled sample dataset.
pub fn sample_contracts() -> Result<Vec<Contract>, serde_json::Error> {
  serde_json::from_str(SAMPLE_CONTRACTS)
}

/// `POST /_/tenant`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  ctx: RequestContext,
  Json(attributes): Json<TenantAttributes>,
) -> Result<(StatusCode, Json<TenantResult>), ApiError>
where
  S: ContractStore,
{
  let tenant = ctx.tenant.clone();
  tracing::info!(
    %tenant,
    module_from = attributes.module_from.as_deref(),
    module_to = attributes.module_to.as_deref(),
    "initialising tenant"
  );

  let loaded_records = if attributes.load_sample() {
    let contracts = sample_contracts().map_err(|e| ApiError::Store(Box::new(e)))?;
    let n = state
      .store
      .bulk_load(ctx.tenant, ctx.actor, contracts)
      .await
      .map_err(store_err)?;
    tracing::info!(%tenant, n, "loaded sample contracts");
    n
  } else {
    0
  };

  Ok((StatusCode::CREATED, Json(TenantResult { loaded_records })))
}
