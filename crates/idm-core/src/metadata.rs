//! Record metadata and the stamping step shared by every write path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{context::Actor, contract::Contract};

/// Creation and update bookkeeping. Never accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
  pub created_date:        DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_by_user_id:  Option<Uuid>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_by_username: Option<String>,
  pub updated_date:        DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_by_user_id:  Option<Uuid>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_by_username: Option<String>,
}

/// Populate `record.metadata` for a write performed by `actor` at `now`.
///
/// Creation fields already present on the record are kept; otherwise they are
/// set from `actor` and `now`. Update fields are always overwritten.
/// `updated_date` never precedes `created_date`.
///
/// Callers that must not trust incoming metadata clear it first.
pub fn stamp(mut record: Contract, actor: &Actor, now: DateTime<Utc>) -> Contract {
  let metadata = match record.metadata.take() {
    Some(prior) => Metadata {
      updated_date: now.max(prior.created_date),
      updated_by_user_id: actor.user_id,
      updated_by_username: actor.username.clone(),
      ..prior
    },
    None => Metadata {
      created_date:        now,
      created_by_user_id:  actor.user_id,
      created_by_username: actor.username.clone(),
      updated_date:        now,
      updated_by_user_id:  actor.user_id,
      updated_by_username: actor.username.clone(),
    },
  };
  record.metadata = Some(metadata);
  record
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  fn actor(name: &str) -> Actor {
    Actor { user_id: Some(Uuid::new_v4()), username: Some(name.into()) }
  }

  #[test]
  fn fresh_record_gets_identical_created_and_updated() {
    let a = actor("admin");
    let now = Utc::now();
    let c = stamp(Contract::default(), &a, now);

    let m = c.metadata.unwrap();
    assert_eq!(m.created_date, now);
    assert_eq!(m.updated_date, now);
    assert_eq!(m.created_by_user_id, a.user_id);
    assert_eq!(m.updated_by_username.as_deref(), Some("admin"));
  }

  #[test]
  fn restamping_keeps_creation_and_advances_update() {
    let creator = actor("creator");
    let editor = actor("editor");
    let t0 = Utc::now();
    let t1 = t0 + Duration::seconds(5);

    let first = stamp(Contract::default(), &creator, t0);
    let second = stamp(first, &editor, t1);

    let m = second.metadata.unwrap();
    assert_eq!(m.created_date, t0);
    assert_eq!(m.created_by_user_id, creator.user_id);
    assert_eq!(m.created_by_username.as_deref(), Some("creator"));
    assert_eq!(m.updated_date, t1);
    assert_eq!(m.updated_by_user_id, editor.user_id);
  }

  #[test]
  fn updated_date_never_precedes_created_date() {
    let a = Actor::default();
    let t0 = Utc::now();
    let earlier = t0 - Duration::minutes(1);

    let c = stamp(stamp(Contract::default(), &a, t0), &a, earlier);
    let m = c.metadata.unwrap();
    assert_eq!(m.updated_date, t0);
    assert!(m.updated_date >= m.created_date);
  }
}
