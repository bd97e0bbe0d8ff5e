//! Fact use-case service.
//!
//! [`FactService`] sits between the transport adapters (HTTP server, CLI)
//! and a [`FactStore`]. It validates input, turns missing update/delete
//! targets into [`FactError::NotFound`], and otherwise passes straight
//! through. It caches nothing: every call observes current store state.
//!
//! Update and delete are a read followed by a write with no isolation
//! between them. A concurrent delete landing in between surfaces as
//! `NotFound`.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{FactError, FactResult};
use crate::models::{Fact, FactInput};
use crate::store::FactStore;

/// Orchestrates fact operations over a shared store.
#[derive(Clone)]
pub struct FactService {
    store: Arc<dyn FactStore>,
}

impl FactService {
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self { store }
    }

    /// All facts in store order. Empty when nothing is stored.
    pub async fn get_all_facts(&self) -> FactResult<Vec<Fact>> {
        Ok(self.store.list_facts().await?)
    }

    pub async fn get_fact_by_id(&self, id: Uuid) -> FactResult<Option<Fact>> {
        Ok(self.store.find_fact(id).await?)
    }

    /// Validates `input` and persists it as a new fact.
    pub async fn create_fact(&self, input: FactInput) -> FactResult<Fact> {
        let input = input.validated()?;
        Ok(self.store.insert_fact(&input).await?)
    }

    /// Replaces the mutable fields of an existing fact.
    ///
    /// # Errors
    ///
    /// [`FactError::Validation`] for bad input, [`FactError::NotFound`] if
    /// `id` does not exist.
    pub async fn update_fact(&self, id: Uuid, input: FactInput) -> FactResult<Fact> {
        let input = input.validated()?;

        if self.store.find_fact(id).await?.is_none() {
            return Err(FactError::NotFound(id));
        }

        self.store
            .update_fact(id, &input)
            .await?
            .ok_or(FactError::NotFound(id))
    }

    /// Permanently removes a fact.
    ///
    /// # Errors
    ///
    /// [`FactError::NotFound`] if `id` does not exist.
    pub async fn delete_fact(&self, id: Uuid) -> FactResult<()> {
        if self.store.find_fact(id).await?.is_none() {
            return Err(FactError::NotFound(id));
        }

        if self.store.delete_fact(id).await? {
            Ok(())
        } else {
            Err(FactError::NotFound(id))
        }
    }

    /// Facts whose title contains `query`, ignoring case. An empty query
    /// matches nothing.
    pub async fn search_facts_by_title(&self, query: &str) -> FactResult<Vec<Fact>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.search_by_title(query).await?)
    }

    /// Up to `size` distinct titles starting with `partial` (ignoring case),
    /// skipping the first `page * size` matches.
    pub async fn autocomplete_titles(
        &self,
        partial: &str,
        page: u32,
        size: u32,
    ) -> FactResult<Vec<String>> {
        if size == 0 {
            return Ok(Vec::new());
        }
        let offset = u64::from(page) * u64::from(size);
        Ok(self.store.autocomplete_titles(partial, size, offset).await?)
    }

    /// Exact title match ignoring case; newest wins among duplicates.
    pub async fn find_fact_by_title_ignore_case(&self, title: &str) -> FactResult<Option<Fact>> {
        Ok(self.store.find_by_title_ignore_case(title).await?)
    }

    /// A uniformly chosen fact, or `None` when the store is empty.
    pub async fn get_random_fact(&self) -> FactResult<Option<Fact>> {
        Ok(self.store.random_fact().await?)
    }

    pub async fn count_facts(&self) -> FactResult<u64> {
        Ok(self.store.count_facts().await?)
    }
}
