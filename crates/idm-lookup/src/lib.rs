//! Identity lookup proxy.
//!
//! Forwards a partial person descriptor to the external identity directory
//! (the IDM) and hands back its answer untouched, so callers see the
//! upstream status and diagnostics as-is.

pub mod client;
pub mod error;
pub mod query;

pub use client::{IdmClient, LookupConfig, RelayedResponse};
pub use error::{Error, Result};
pub use query::LookupQuery;

#[cfg(test)]
mod tests;
