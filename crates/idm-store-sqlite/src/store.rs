//! The SQLite implementation of [`ContractStore`].

use std::path::Path;

use chrono::Utc;
use idm_core::{
  context::{Actor, Tenant},
  contract::Contract,
  metadata::stamp,
  store::{ContractPage, ContractQuery, ContractStore},
};
use rusqlite::{
  OptionalExtension as _,
  functions::FunctionFlags,
  types::{Value, ValueRef},
};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{RawContract, encode_contract, encode_uuid},
  filter,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contract store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Scalar functions the filter dialect relies on.
fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    filter::LOWER_FN,
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let lowered = match ctx.get_raw(0) {
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).to_lowercase()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
      };
      Ok(lowered)
    },
  )
}

// ─── ContractStore impl ──────────────────────────────────────────────────────

impl ContractStore for SqliteStore {
  type Error = Error;

  async fn list(&self, tenant: Tenant, query: ContractQuery) -> Result<ContractPage> {
    let filter = filter::parse(query.filter.as_deref().unwrap_or_default())?;
    let (where_sql, filter_params) = filter.where_sql();
    let order_sql = filter.order_sql();

    let mut params = vec![Value::Text(tenant.to_string())];
    params.extend(filter_params);
    let limit_val  = i64::try_from(query.limit).unwrap_or(i64::MAX);
    let offset_val = i64::try_from(query.offset).unwrap_or(i64::MAX);

    let (total, raws): (i64, Vec<RawContract>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let total: i64 = tx.query_row(
          &format!("SELECT COUNT(*) FROM contracts WHERE tenant = ?{where_sql}"),
          rusqlite::params_from_iter(params.iter()),
          |row| row.get(0),
        )?;

        let mut page_params = params;
        page_params.push(Value::Integer(limit_val));
        page_params.push(Value::Integer(offset_val));

        let rows = {
          let mut stmt = tx.prepare(&format!(
            "SELECT id, jsonb FROM contracts
             WHERE tenant = ?{where_sql}
             {order_sql}
             LIMIT ? OFFSET ?"
          ))?;
          stmt
            .query_map(
              rusqlite::params_from_iter(page_params.iter()),
              RawContract::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        tx.commit()?;
        Ok((total, rows))
      })
      .await?;

    let contracts = raws
      .into_iter()
      .map(RawContract::into_contract)
      .collect::<Result<Vec<_>>>()?;

    Ok(ContractPage {
      contracts,
      total_records: usize::try_from(total).unwrap_or_default(),
    })
  }

  async fn create(
    &self,
    tenant: Tenant,
    actor: Actor,
    mut contract: Contract,
  ) -> Result<Contract> {
    contract.validate()?;
    contract.metadata = None;
    let id = *contract.id.get_or_insert_with(Uuid::new_v4);
    let contract = stamp(contract, &actor, Utc::now());

    let tenant_str = tenant.to_string();
    let id_str     = encode_uuid(id);
    let jsonb      = encode_contract(&contract)?;

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO contracts (tenant, id, jsonb) VALUES (?1, ?2, ?3)",
          rusqlite::params![tenant_str, id_str, jsonb],
        )?)
      })
      .await?;

    if inserted == 0 {
      return Err(idm_core::Error::Conflict(id).into());
    }

    tracing::debug!(%tenant, %id, "created contract");
    Ok(contract)
  }

  async fn get(&self, tenant: Tenant, id: Uuid) -> Result<Option<Contract>> {
    let tenant_str = tenant.to_string();
    let id_str     = encode_uuid(id);

    let raw: Option<RawContract> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, jsonb FROM contracts WHERE tenant = ?1 AND id = ?2",
            rusqlite::params![tenant_str, id_str],
            RawContract::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawContract::into_contract).transpose()
  }

  async fn update(
    &self,
    tenant: Tenant,
    actor: Actor,
    id: Uuid,
    contract: Contract,
  ) -> Result<()> {
    let mut contract = contract.with_path_id(id)?;
    contract.validate()?;

    let stored = self
      .get(tenant.clone(), id)
      .await?
      .ok_or(idm_core::Error::NotFound(id))?;
    contract.metadata = stored.metadata;
    let contract = stamp(contract, &actor, Utc::now());

    let tenant_str = tenant.to_string();
    let id_str     = encode_uuid(id);
    let jsonb      = encode_contract(&contract)?;

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE contracts SET jsonb = ?3 WHERE tenant = ?1 AND id = ?2",
          rusqlite::params![tenant_str, id_str, jsonb],
        )?)
      })
      .await?;

    // Deleted concurrently between the read and the write.
    if updated == 0 {
      return Err(idm_core::Error::NotFound(id).into());
    }

    tracing::debug!(%tenant, %id, "updated contract");
    Ok(())
  }

  async fn delete(&self, tenant: Tenant, id: Uuid) -> Result<()> {
    let tenant_str = tenant.to_string();
    let id_str     = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM contracts WHERE tenant = ?1 AND id = ?2",
          rusqlite::params![tenant_str, id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(idm_core::Error::NotFound(id).into());
    }

    tracing::debug!(%tenant, %id, "deleted contract");
    Ok(())
  }

  async fn bulk_load(
    &self,
    tenant: Tenant,
    actor: Actor,
    contracts: Vec<Contract>,
  ) -> Result<usize> {
    let now = Utc::now();

    let mut rows = Vec::with_capacity(contracts.len());
    for mut contract in contracts {
      contract.validate()?;
      contract.metadata = None;
      let id = *contract.id.get_or_insert_with(Uuid::new_v4);
      let contract = stamp(contract, &actor, now);
      rows.push((encode_uuid(id), encode_contract(&contract)?));
    }

    let tenant_str = tenant.to_string();

    // A failed insert drops `tx` without commit, rolling back the batch.
    let count = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx
            .prepare("INSERT INTO contracts (tenant, id, jsonb) VALUES (?1, ?2, ?3)")?;
          for (id_str, jsonb) in &rows {
            stmt.execute(rusqlite::params![tenant_str, id_str, jsonb])?;
          }
        }
        tx.commit()?;
        Ok(rows.len())
      })
      .await?;

    tracing::info!(%tenant, count, "bulk-loaded contracts");
    Ok(count)
  }
}
