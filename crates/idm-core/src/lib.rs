//! Core types and trait definitions for the IDM contract service.
//!
//! This crate has no HTTP or database dependencies.
//! The store backend, the HTTP API and the server binary all build on it.

// Native `async fn` in traits; futures are declared `Send` on the trait.
#![allow(async_fn_in_trait)]

pub mod context;
pub mod contract;
pub mod error;
pub mod metadata;
pub mod store;

pub use error::{Error, Result};
