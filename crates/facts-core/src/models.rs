//! Fact data model.
//!
//! [`Fact`] is the persisted record as served over HTTP. [`FactInput`] is
//! the client-supplied shape for create and update: it has no id or
//! timestamps, so any such fields in a request body are ignored.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{FactError, FactResult};

/// Maximum title length, in characters.
pub const MAX_TITLE_LEN: usize = 255;
/// Maximum tag length, in characters.
pub const MAX_TAG_LEN: usize = 50;
/// Maximum source URL length, in characters.
pub const MAX_SOURCE_URL_LEN: usize = 500;

/// A stored fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub tag: String,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fact {
    /// Builds a new fact from validated input, assigning a fresh id and
    /// setting both timestamps to `now`.
    pub fn create(input: &FactInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title.clone(),
            body: input.body.clone(),
            tag: input.tag.clone(),
            source_url: input.source_url.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the mutable fields from `input` and refreshes `updated_at`.
    ///
    /// `id` and `created_at` are left untouched. `updated_at` never moves
    /// backwards, even if the wall clock does.
    pub fn apply(&mut self, input: &FactInput, now: DateTime<Utc>) {
        self.title = input.title.clone();
        self.body = input.body.clone();
        self.tag = input.tag.clone();
        self.source_url = input.source_url.clone();
        self.updated_at = now.max(self.updated_at);
    }
}

/// Client-supplied fields for creating or updating a fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FactInput {
    pub title: String,
    pub body: String,
    pub tag: String,
    #[serde(default)]
    pub source_url: Option<String>,
}

impl FactInput {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        tag: impl Into<String>,
        source_url: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tag: tag.into(),
            source_url,
        }
    }

    /// Checks field constraints and normalizes an empty source URL to `None`.
    pub fn validated(mut self) -> FactResult<Self> {
        require("title", &self.title, Some(MAX_TITLE_LEN))?;
        require("body", &self.body, None)?;
        require("tag", &self.tag, Some(MAX_TAG_LEN))?;

        if self.source_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            self.source_url = None;
        }
        if let Some(url) = &self.source_url {
            if url.chars().count() > MAX_SOURCE_URL_LEN {
                return Err(FactError::Validation(format!(
                    "sourceUrl must be at most {} characters",
                    MAX_SOURCE_URL_LEN
                )));
            }
        }

        Ok(self)
    }
}

fn require(field: &str, value: &str, max_len: Option<usize>) -> FactResult<()> {
    if value.trim().is_empty() {
        return Err(FactError::Validation(format!("{} must not be empty", field)));
    }
    if let Some(max) = max_len {
        if value.chars().count() > max {
            return Err(FactError::Validation(format!(
                "{} must be at most {} characters",
                field, max
            )));
        }
    }
    Ok(())
}

/// Case-folded form of a title. Every store compares titles through this,
/// so "ignoring case" means the same thing for non-ASCII text everywhere.
pub fn fold_title(title: &str) -> String {
    title.to_lowercase()
}

/// Current time truncated to millisecond precision, the resolution stores
/// persist timestamps at.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
