//! # Facts Core
//!
//! Storage-agnostic logic for Facts: the [`Fact`](models::Fact) model,
//! input validation, the [`FactStore`](store::FactStore) abstraction, an
//! in-memory store, and the [`FactService`](service::FactService) that the
//! HTTP server and CLI both drive.
//!
//! This crate contains no tokio, sqlx, axum, or other runtime-specific
//! dependencies. The SQLite backend lives in the `facts` crate.

pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use error::{FactError, FactResult};
pub use models::{Fact, FactInput};
pub use service::FactService;
pub use store::FactStore;
