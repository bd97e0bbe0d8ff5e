//! Storage abstraction for facts.
//!
//! The [`FactStore`] trait exposes exactly the query shapes the service
//! needs and nothing more: there is no generic query builder. The store
//! owns id generation and timestamp bookkeeping.
//!
//! Implementations must be `Send + Sync` to be shared across request
//! handlers.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Fact, FactInput};

/// Abstract storage backend for facts.
///
/// "Store order" below means creation order, oldest first.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`list_facts`](FactStore::list_facts) | All facts in store order |
/// | [`find_fact`](FactStore::find_fact) | Lookup by id |
/// | [`search_by_title`](FactStore::search_by_title) | Case-insensitive title substring match |
/// | [`autocomplete_titles`](FactStore::autocomplete_titles) | Distinct titles by case-insensitive prefix, paged |
/// | [`find_by_title_ignore_case`](FactStore::find_by_title_ignore_case) | Exact title match ignoring case |
/// | [`random_fact`](FactStore::random_fact) | One uniformly chosen fact |
/// | [`insert_fact`](FactStore::insert_fact) | Create, assigning id and timestamps |
/// | [`update_fact`](FactStore::update_fact) | Overwrite mutable fields |
/// | [`delete_fact`](FactStore::delete_fact) | Permanent removal |
/// | [`count_facts`](FactStore::count_facts) | Number of stored facts |
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Every fact, in store order.
    async fn list_facts(&self) -> Result<Vec<Fact>>;

    /// The fact with `id`, if any.
    async fn find_fact(&self, id: Uuid) -> Result<Option<Fact>>;

    /// Facts whose title contains `query`, ignoring case, in store order.
    async fn search_by_title(&self, query: &str) -> Result<Vec<Fact>>;

    /// Distinct titles starting with `partial`, ignoring case.
    ///
    /// Titles are ordered by the first fact that carries them. At most
    /// `limit` titles are returned after skipping `offset` matches.
    async fn autocomplete_titles(&self, partial: &str, limit: u32, offset: u64)
        -> Result<Vec<String>>;

    /// A fact whose title equals `title` ignoring case.
    ///
    /// Titles are not unique; when several match, the most recently created
    /// one is returned.
    async fn find_by_title_ignore_case(&self, title: &str) -> Result<Option<Fact>>;

    /// One fact chosen uniformly at random, or `None` if the store is empty.
    async fn random_fact(&self) -> Result<Option<Fact>>;

    /// Persists a new fact built from `input`. The store assigns the id and
    /// sets `created_at` and `updated_at`.
    async fn insert_fact(&self, input: &FactInput) -> Result<Fact>;

    /// Overwrites title, body, tag, and source URL of the fact with `id` and
    /// refreshes `updated_at`. Returns `None` if no such fact exists.
    async fn update_fact(&self, id: Uuid, input: &FactInput) -> Result<Option<Fact>>;

    /// Removes the fact with `id`. Returns `false` if no such fact existed.
    async fn delete_fact(&self, id: Uuid) -> Result<bool>;

    /// Number of stored facts.
    async fn count_facts(&self) -> Result<u64>;
}
