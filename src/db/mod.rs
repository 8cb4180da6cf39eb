pub mod models;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};
use serde::Deserialize;
use std::path::Path;

use crate::state::DbPool;

pub const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial",
    include_str!("../../migrations/001_initial.sql"),
)];

fn init_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        ",
    )
}

pub fn create_pool(db_path: &Path) -> anyhow::Result<DbPool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let manager = SqliteConnectionManager::file(db_path).with_init(init_connection);
    let pool = Pool::builder().max_size(8).build(manager)?;

    let conn = pool.get()?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        ",
    )?;

    Ok(pool)
}

/// Single-connection in-memory pool. Every checkout sees the same database.
pub fn create_memory_pool() -> anyhow::Result<DbPool> {
    let manager = SqliteConnectionManager::memory().with_init(init_connection);
    let pool = Pool::builder().max_size(1).build(manager)?;
    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;

    // Create migrations tracking table
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM schema_version WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        if !already_applied {
            tracing::info!("Applying migration: {}", name);
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO schema_version (name) VALUES (?1)",
                params![name],
            )?;
        }
    }

    tracing::info!("Database migrations complete");
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct IngredientFixture {
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Deserialize)]
pub struct TagFixture {
    pub name: String,
    pub slug: String,
    pub color: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub ingredients: Vec<IngredientFixture>,
    pub tags: Vec<TagFixture>,
}

/// Counts of rows actually inserted by an import; existing rows are skipped.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub ingredients: usize,
    pub tags: usize,
}

pub fn import_fixture(pool: &DbPool, fixture: &Fixture) -> anyhow::Result<ImportSummary> {
    let mut conn = pool.get()?;
    let tx = conn.transaction()?;
    let mut summary = ImportSummary::default();

    {
        let mut insert_ingredient = tx.prepare(
            "INSERT OR IGNORE INTO ingredients (name, measurement_unit) VALUES (?1, ?2)",
        )?;
        for item in &fixture.ingredients {
            summary.ingredients +=
                insert_ingredient.execute(params![item.name.trim(), item.measurement_unit.trim()])?;
        }

        let mut insert_tag =
            tx.prepare("INSERT OR IGNORE INTO tags (name, slug, color) VALUES (?1, ?2, ?3)")?;
        for tag in &fixture.tags {
            summary.tags += insert_tag.execute(params![tag.name, tag.slug, tag.color])?;
        }
    }

    tx.commit()?;
    tracing::info!(
        "Imported {} ingredients and {} tags",
        summary.ingredients,
        summary.tags
    );
    Ok(summary)
}

pub fn import_fixture_file(pool: &DbPool, path: &Path) -> anyhow::Result<ImportSummary> {
    let content = std::fs::read_to_string(path)?;
    let fixture: Fixture = serde_json::from_str(&content)?;
    import_fixture(pool, &fixture)
}
