//! Contract types, the single persisted entity of the service.
//!
//! A contract records a person's enrolment with the identity management
//! system together with its workflow status. Field names follow the JSON
//! wire format (camelCase).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, metadata::Metadata};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where a contract stands in the IDM enrolment workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
  #[serde(rename = "draft")]
  Draft,
  #[serde(rename = "updated")]
  Updated,
  #[serde(rename = "pending")]
  Pending,
  #[serde(rename = "transmission error")]
  TransmissionError,
  #[serde(rename = "activated")]
  Activated,
}

impl ContractStatus {
  /// The string stored in the JSON document and matched by filters.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Draft => "draft",
      Self::Updated => "updated",
      Self::Pending => "pending",
      Self::TransmissionError => "transmission error",
      Self::Activated => "activated",
    }
  }
}

// ─── Embedded value objects ──────────────────────────────────────────────────

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address_line1: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address_line2: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub city:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub zip_code:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub country:       Option<String>,
}

/// Personal details of the contract holder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personal {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub first_name:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_name:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date_of_birth:  Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email:          Option<String>,
  /// e.g. "Dr." or "Prof."
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub academic_title: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:        Option<Address>,
}

// ─── Contract ────────────────────────────────────────────────────────────────

/// A contract as exchanged with callers and stored by a
/// [`ContractStore`](crate::store::ContractStore).
///
/// `id` and `metadata` are owned by the store: `id` is assigned on creation
/// when absent, and `metadata` is always overwritten on write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:           Option<Uuid>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status:       Option<ContractStatus>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub begin_date:   Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_date:     Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub uni_login:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub library_card: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub comment:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub personal:     Option<Personal>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata:     Option<Metadata>,
}

impl Contract {
  /// Check that every required field is present.
  ///
  /// Required: `status`, `personal.firstName`, `personal.lastName` and
  /// `personal.dateOfBirth`. Names must not be blank.
  pub fn validate(&self) -> Result<()> {
    let mut missing = Vec::new();

    if self.status.is_none() {
      missing.push("status");
    }
    match &self.personal {
      None => missing.push("personal"),
      Some(p) => {
        if is_blank(p.first_name.as_deref()) {
          missing.push("personal.firstName");
        }
        if is_blank(p.last_name.as_deref()) {
          missing.push("personal.lastName");
        }
        if p.date_of_birth.is_none() {
          missing.push("personal.dateOfBirth");
        }
      }
    }

    if missing.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation(format!(
        "missing required field(s): {}",
        missing.join(", ")
      )))
    }
  }

  /// Reconcile the body `id` with the identifier taken from the request
  /// path. A body without `id` adopts the path identifier.
  pub fn with_path_id(mut self, path_id: Uuid) -> Result<Self> {
    match self.id {
      Some(body_id) if body_id != path_id => Err(Error::Validation(format!(
        "id {body_id} in body does not match id {path_id} in path"
      ))),
      _ => {
        self.id = Some(path_id);
        Ok(self)
      }
    }
  }
}

fn is_blank(s: Option<&str>) -> bool { s.is_none_or(|s| s.trim().is_empty()) }
