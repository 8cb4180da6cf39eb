//! Read-only reference data: tags and ingredients.

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::{Ingredient, Tag};

pub fn list_tags(conn: &Connection) -> Result<Vec<Tag>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT id, name, slug, color FROM tags ORDER BY id")?;
    let tags = stmt
        .query_map([], Tag::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

pub fn find_tag(conn: &Connection, id: i64) -> Result<Option<Tag>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, name, slug, color FROM tags WHERE id = ?1",
        params![id],
        Tag::from_row,
    )
    .optional()
}

/// Ingredients sorted by name, optionally narrowed to names starting with
/// `prefix` (case-insensitive, Unicode-aware).
pub fn list_ingredients(
    conn: &Connection,
    prefix: Option<&str>,
) -> Result<Vec<Ingredient>, rusqlite::Error> {
    let mut stmt =
        conn.prepare("SELECT id, name, measurement_unit FROM ingredients ORDER BY name, id")?;
    let all = stmt
        .query_map([], Ingredient::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let prefix = prefix.map(|p| p.trim().to_lowercase()).unwrap_or_default();
    if prefix.is_empty() {
        return Ok(all);
    }
    // SQLite's lower() and LIKE only fold ASCII, so match in Rust.
    Ok(all
        .into_iter()
        .filter(|i| i.name.to_lowercase().starts_with(&prefix))
        .collect())
}

pub fn find_ingredient(conn: &Connection, id: i64) -> Result<Option<Ingredient>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, name, measurement_unit FROM ingredients WHERE id = ?1",
        params![id],
        Ingredient::from_row,
    )
    .optional()
}
