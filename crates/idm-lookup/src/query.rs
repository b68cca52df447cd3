//! The inbound lookup descriptor and its translation into upstream query
//! parameters.

use chrono::NaiveDate;
use serde::Deserialize;

/// A partial person descriptor. Every field is independently optional; an
/// absent field is never sent upstream, not even as an empty parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupQuery {
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  /// Free-form; ISO dates are compacted before forwarding.
  pub date_of_birth: Option<String>,
}

/// Reformat an ISO calendar date (`1998-12-24`) to the compact form the IDM
/// expects (`19981224`). Anything else, including valid dates written with
/// unpadded fields, a sign or surrounding whitespace, is returned unchanged.
pub fn normalize_date_of_birth(raw: &str) -> String {
  if !has_iso_date_shape(raw) {
    return raw.to_owned();
  }
  match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    Ok(date) => date.format("%Y%m%d").to_string(),
    Err(_) => raw.to_owned(),
  }
}

/// Exactly `DDDD-DD-DD`.
fn has_iso_date_shape(raw: &str) -> bool {
  let bytes = raw.as_bytes();
  bytes.len() == 10
    && bytes.iter().enumerate().all(|(i, b)| match i {
      4 | 7 => *b == b'-',
      _ => b.is_ascii_digit(),
    })
}

impl LookupQuery {
  /// Upstream query parameters in a stable order, present fields only.
  pub fn upstream_params(&self) -> Vec<(&'static str, String)> {
    [
      ("givenname", self.first_name.clone()),
      ("surname", self.last_name.clone()),
      (
        "date_of_birth",
        self.date_of_birth.as_deref().map(normalize_date_of_birth),
      ),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|v| (key, v)))
    .collect()
  }
}
