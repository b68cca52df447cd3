//! JSON REST API for the IDM contract service.
//!
//! Exposes an axum [`Router`] backed by any [`ContractStore`] plus an
//! [`IdmClient`] for the lookup proxy. Authentication and TLS are handled by
//! the gateway in front of the service; tenant and user identity arrive as
//! `x-okapi-*` headers (see [`context`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = idm_api::api_router(AppState { store, lookup });
//! ```

pub mod context;
pub mod contracts;
pub mod error;
pub mod searchidm;
pub mod tenant;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use idm_core::store::ContractStore;
use idm_lookup::IdmClient;

pub use error::ApiError;

/// Base path of the contract collection; also used for `Location` headers.
pub const CONTRACTS_PATH: &str = "/idm-connect/contract";

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S: ContractStore> {
  pub store:  Arc<S>,
  pub lookup: Arc<IdmClient>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the fully-materialised API router.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ContractStore + Clone + 'static,
{
  Router::new()
    // Contracts
    .route(
      CONTRACTS_PATH,
      get(contracts::list::<S>).post(contracts::create::<S>),
    )
    .route(
      "/idm-connect/contract/{id}",
      get(contracts::get_one::<S>)
        .put(contracts::update::<S>)
        .delete(contracts::delete_one::<S>),
    )
    // Lookup proxy
    .route("/idm-connect/searchidm", get(searchidm::handler::<S>))
    // Tenant lifecycle
    .route("/_/tenant", post(tenant::handler::<S>))
    .with_state(state)
}
