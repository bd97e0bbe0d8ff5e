//! In-memory [`FactStore`] implementation for tests and embedding.
//!
//! Facts live in a `Vec` behind `std::sync::RwLock`, so insertion order is
//! store order. Titles are compared through [`fold_title`].

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::models::{fold_title, now_millis, Fact, FactInput};

use super::FactStore;

/// In-memory fact store.
pub struct InMemoryFactStore {
    facts: RwLock<Vec<Fact>>,
}

impl InMemoryFactStore {
    pub fn new() -> Self {
        Self {
            facts: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Fact>>> {
        self.facts
            .read()
            .map_err(|_| anyhow!("in-memory fact store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Fact>>> {
        self.facts
            .write()
            .map_err(|_| anyhow!("in-memory fact store lock poisoned"))
    }
}

impl Default for InMemoryFactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FactStore for InMemoryFactStore {
    async fn list_facts(&self) -> Result<Vec<Fact>> {
        Ok(self.read()?.clone())
    }

    async fn find_fact(&self, id: Uuid) -> Result<Option<Fact>> {
        Ok(self.read()?.iter().find(|f| f.id == id).cloned())
    }

    async fn search_by_title(&self, query: &str) -> Result<Vec<Fact>> {
        let needle = fold_title(query);
        Ok(self
            .read()?
            .iter()
            .filter(|f| fold_title(&f.title).contains(&needle))
            .cloned()
            .collect())
    }

    async fn autocomplete_titles(
        &self,
        partial: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<String>> {
        let prefix = fold_title(partial);
        let facts = self.read()?;

        let mut titles: Vec<String> = Vec::new();
        for fact in facts.iter() {
            if fold_title(&fact.title).starts_with(&prefix) && !titles.contains(&fact.title) {
                titles.push(fact.title.clone());
            }
        }

        Ok(titles
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect())
    }

    async fn find_by_title_ignore_case(&self, title: &str) -> Result<Option<Fact>> {
        let wanted = fold_title(title);
        // Later entries were created later; the last match is the newest.
        Ok(self
            .read()?
            .iter()
            .rev()
            .find(|f| fold_title(&f.title) == wanted)
            .cloned())
    }

    async fn random_fact(&self) -> Result<Option<Fact>> {
        let facts = self.read()?;
        Ok(facts.choose(&mut rand::thread_rng()).cloned())
    }

    async fn insert_fact(&self, input: &FactInput) -> Result<Fact> {
        let fact = Fact::create(input, now_millis());
        self.write()?.push(fact.clone());
        Ok(fact)
    }

    async fn update_fact(&self, id: Uuid, input: &FactInput) -> Result<Option<Fact>> {
        let mut facts = self.write()?;
        Ok(facts.iter_mut().find(|f| f.id == id).map(|fact| {
            fact.apply(input, now_millis());
            fact.clone()
        }))
    }

    async fn delete_fact(&self, id: Uuid) -> Result<bool> {
        let mut facts = self.write()?;
        let before = facts.len();
        facts.retain(|f| f.id != id);
        Ok(facts.len() != before)
    }

    async fn count_facts(&self) -> Result<u64> {
        Ok(self.read()?.len() as u64)
    }
}
