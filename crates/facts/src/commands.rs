//! CLI entry points for fact administration.
//!
//! Each `run_*` function opens the configured database, performs one
//! [`FactService`] call, closes the pool, and prints the result to stdout.
//! Failures are returned as errors; the binary prints them to stderr and
//! exits non-zero.
//!
//! # Usage
//!
//! ```bash
//! facts add --title "Honey never spoils" --body "..." --tag food
//! facts search honey
//! facts autocomplete Ho --size 5
//! facts title "honey never spoils"
//! facts delete 550e8400-e29b-41d4-a716-446655440000
//! ```

use anyhow::{anyhow, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use facts_core::{Fact, FactError, FactInput, FactService};

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteFactStore;

async fn open(config: &Config) -> Result<(SqlitePool, FactService)> {
    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;
    let service = FactService::new(Arc::new(SqliteFactStore::new(pool.clone())));
    Ok((pool, service))
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| anyhow!("invalid fact id: '{}'", raw))
}

/// `facts list`
pub async fn run_list(config: &Config) -> Result<()> {
    let (pool, service) = open(config).await?;
    let facts = service.get_all_facts().await;
    pool.close().await;

    print_summaries(&facts?);
    Ok(())
}

/// `facts get <id>`
pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let (pool, service) = open(config).await?;
    let fact = service.get_fact_by_id(id).await;
    pool.close().await;

    match fact? {
        Some(fact) => print_fact(&fact),
        None => return Err(FactError::NotFound(id).into()),
    }
    Ok(())
}

/// `facts add`
pub async fn run_add(config: &Config, input: FactInput) -> Result<()> {
    let (pool, service) = open(config).await?;
    let fact = service.create_fact(input).await;
    pool.close().await;

    let fact = fact?;
    println!("Created fact {}", fact.id);
    println!();
    print_fact(&fact);
    Ok(())
}

/// `facts update <id>`
pub async fn run_update(config: &Config, id: &str, input: FactInput) -> Result<()> {
    let id = parse_id(id)?;
    let (pool, service) = open(config).await?;
    let fact = service.update_fact(id, input).await;
    pool.close().await;

    let fact = fact?;
    println!("Updated fact {}", fact.id);
    println!();
    print_fact(&fact);
    Ok(())
}

/// `facts delete <id>`
pub async fn run_delete(config: &Config, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let (pool, service) = open(config).await?;
    let result = service.delete_fact(id).await;
    pool.close().await;

    result?;
    println!("Deleted fact {}", id);
    Ok(())
}

/// `facts search <query>`
pub async fn run_search(config: &Config, query: &str) -> Result<()> {
    let (pool, service) = open(config).await?;
    let facts = service.search_facts_by_title(query).await;
    pool.close().await;

    let facts = facts?;
    if facts.is_empty() {
        println!("No facts match '{}'.", query);
        return Ok(());
    }
    print_summaries(&facts);
    Ok(())
}

/// `facts autocomplete <partial>`
pub async fn run_autocomplete(config: &Config, partial: &str, page: u32, size: u32) -> Result<()> {
    let (pool, service) = open(config).await?;
    let titles = service.autocomplete_titles(partial, page, size).await;
    pool.close().await;

    for title in titles? {
        println!("{}", title);
    }
    Ok(())
}

/// `facts random`
pub async fn run_random(config: &Config) -> Result<()> {
    let (pool, service) = open(config).await?;
    let fact = service.get_random_fact().await;
    pool.close().await;

    match fact? {
        Some(fact) => print_fact(&fact),
        None => println!("No facts stored yet."),
    }
    Ok(())
}

/// `facts title <title>`
pub async fn run_title(config: &Config, title: &str) -> Result<()> {
    let (pool, service) = open(config).await?;
    let fact = service.find_fact_by_title_ignore_case(title).await;
    pool.close().await;

    match fact? {
        Some(fact) => print_fact(&fact),
        None => anyhow::bail!("no fact titled '{}'", title),
    }
    Ok(())
}

fn print_fact(fact: &Fact) {
    println!("--- Fact ---");
    println!("id:          {}", fact.id);
    println!("title:       {}", fact.title);
    println!("tag:         {}", fact.tag);
    if let Some(ref url) = fact.source_url {
        println!("source_url:  {}", url);
    }
    println!("created_at:  {}", fact.created_at.to_rfc3339());
    println!("updated_at:  {}", fact.updated_at.to_rfc3339());
    println!();

    println!("--- Body ---");
    println!("{}", fact.body);
}

fn print_summaries(facts: &[Fact]) {
    println!("{} fact(s)", facts.len());
    for (i, fact) in facts.iter().enumerate() {
        println!();
        println!("{}. [{}] {}", i + 1, fact.tag, fact.title);
        println!("    id: {}", fact.id);
    }
}
