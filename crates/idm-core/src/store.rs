//! The `ContractStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `idm-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  context::{Actor, Tenant},
  contract::Contract,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Default page size when the caller gives no `limit`.
pub const DEFAULT_LIMIT: usize = 10;

/// Parameters for [`ContractStore::list`].
#[derive(Debug, Clone)]
pub struct ContractQuery {
  /// Backend-native filter expression. `None` or blank matches everything.
  pub filter: Option<String>,
  pub offset: usize,
  pub limit:  usize,
}

impl Default for ContractQuery {
  fn default() -> Self {
    Self { filter: None, offset: 0, limit: DEFAULT_LIMIT }
  }
}

/// One page of [`ContractStore::list`] results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractPage {
  pub contracts:     Vec<Contract>,
  /// Number of matching records, independent of `offset`/`limit`.
  pub total_records: usize,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a tenant-partitioned contract store.
///
/// Every write either fully succeeds or leaves the store untouched. Backend
/// errors convert into [`crate::Error`] so callers can tell validation,
/// not-found and conflict conditions apart from storage failures.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContractStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Return a page of contracts matching `query` plus the total match count.
  fn list(
    &self,
    tenant: Tenant,
    query: ContractQuery,
  ) -> impl Future<Output = Result<ContractPage, Self::Error>> + Send + '_;

  /// Validate, stamp and persist a new contract.
  ///
  /// A missing `id` is generated; caller-supplied metadata is discarded.
  /// Fails if a contract with the same `id` already exists for the tenant.
  fn create(
    &self,
    tenant: Tenant,
    actor: Actor,
    contract: Contract,
  ) -> impl Future<Output = Result<Contract, Self::Error>> + Send + '_;

  /// Retrieve a contract by id. Returns `None` if not found.
  fn get(
    &self,
    tenant: Tenant,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Contract>, Self::Error>> + Send + '_;

  /// Replace the contract stored under `id` with `contract`.
  ///
  /// Creation metadata of the stored record is preserved; update metadata is
  /// re-stamped. A body `id` must match `id`.
  fn update(
    &self,
    tenant: Tenant,
    actor: Actor,
    id: Uuid,
    contract: Contract,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the contract stored under `id`.
  fn delete(
    &self,
    tenant: Tenant,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert a batch of contracts in a single atomic unit and return how many
  /// were written. Every record is stamped with the same actor and timestamp.
  /// Intended for tenant bootstrap, not for request traffic.
  fn bulk_load(
    &self,
    tenant: Tenant,
    actor: Actor,
    contracts: Vec<Contract>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
