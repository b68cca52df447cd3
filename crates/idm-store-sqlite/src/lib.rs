//! SQLite backend for the IDM contract store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Contracts are stored as JSON documents
//! keyed by `(tenant, id)`; list filters use the dialect in [`filter`].

mod encode;
mod schema;
mod store;

pub mod error;
pub mod filter;

pub use error::{Error, Result};
pub use store::SqliteStore;
