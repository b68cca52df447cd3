//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings; contracts as compact
//! JSON.

use idm_core::contract::Contract;
use uuid::Uuid;

use crate::Result;

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Contract ────────────────────────────────────────────────────────────────

pub fn encode_contract(c: &Contract) -> Result<String> {
  Ok(serde_json::to_string(c)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `contracts` row.
pub struct RawContract {
  pub id:    String,
  pub jsonb: String,
}

impl RawContract {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, jsonb: row.get(1)? })
  }

  /// Decode the document. The `id` column is authoritative.
  pub fn into_contract(self) -> Result<Contract> {
    let mut contract: Contract = serde_json::from_str(&self.jsonb)?;
    contract.id = Some(decode_uuid(&self.id)?);
    Ok(contract)
  }
}
