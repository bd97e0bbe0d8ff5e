//! # Facts
//!
//! **A small HTTP service for storing, searching, and serving facts.**
//!
//! A fact is a titled, tagged snippet of text with an optional source URL.
//! Facts are kept in SQLite and exposed through a JSON API and a CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐
//! │   HTTP   │   │   CLI    │
//! │  (axum)  │   │ (facts)  │
//! └────┬─────┘   └────┬─────┘
//!      └──────┬───────┘
//!             ▼
//!      ┌─────────────┐   ┌──────────────┐
//!      │ FactService │──▶│  FactStore   │
//!      └─────────────┘   │ SQLite / mem │
//!                        └──────────────┘
//! ```
//!
//! The model, store trait, in-memory store and service live in
//! `facts-core`; this crate adds the SQLite store, the server and the CLI.
//!
//! ## Quick Start
//!
//! ```bash
//! facts init                    # create database
//! facts add --title "Honey never spoils" --body "..." --tag food
//! facts serve                   # start HTTP server
//! curl 'localhost:8080/api/facts/autocomplete?partial=ho'
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Idempotent schema setup |
//! | [`sqlite_store`] | SQLite implementation of `FactStore` |
//! | [`server`] | JSON HTTP API (Axum) with CORS and request tracing |
//! | [`commands`] | CLI entry points |
//! | [`logging`] | Tracing subscriber setup |

pub mod commands;
pub mod config;
pub mod db;
pub mod logging;
pub mod migrate;
pub mod server;
pub mod sqlite_store;

pub use facts_core::{models, service, store};
pub use facts_core::{Fact, FactError, FactInput, FactService, FactStore};
