use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::db::models::{IngredientAmount, Recipe, Tag};
use crate::recipes::collections::RecipeCollection;
use crate::recipes::payload::{IngredientAmountInput, RecipeFields, RecipeFilter};

/// Link a recipe to its tags and insert one `ingredient_recipes` row per
/// entry. Join ids are assigned contiguously from the current maximum + 1.
///
/// Must run inside a transaction: a failure part-way leaves rows behind.
fn add_tags_and_ingredients(
    conn: &Connection,
    recipe_id: i64,
    tags: &[i64],
    ingredients: &[IngredientAmountInput],
) -> Result<(), rusqlite::Error> {
    let mut add_tag =
        conn.prepare("INSERT INTO tag_recipes (tag_id, recipe_id) VALUES (?1, ?2)")?;
    for tag_id in tags {
        add_tag.execute(params![tag_id, recipe_id])?;
    }

    let mut next_id: i64 = conn.query_row(
        "SELECT COALESCE(MAX(id), 0) + 1 FROM ingredient_recipes",
        [],
        |r| r.get(0),
    )?;
    let mut add_ingredient = conn.prepare(
        "INSERT INTO ingredient_recipes (id, recipe_id, ingredient_id, amount)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for item in ingredients {
        add_ingredient.execute(params![next_id, recipe_id, item.id, item.amount])?;
        next_id += 1;
    }

    Ok(())
}

/// Insert a recipe with its tags and ingredients in one transaction.
pub fn create_recipe(
    conn: &mut Connection,
    author_id: i64,
    image: &str,
    fields: &RecipeFields,
) -> Result<i64, rusqlite::Error> {
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO recipes (author_id, name, image, text, cooking_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![author_id, fields.name, image, fields.text, fields.cooking_time],
    )?;
    let recipe_id = tx.last_insert_rowid();

    add_tags_and_ingredients(&tx, recipe_id, &fields.tags, &fields.ingredients)?;

    tx.commit()?;
    tracing::debug!(recipe_id, author_id, "Created recipe");
    Ok(recipe_id)
}

/// Replace a recipe's tag and ingredient sets and update its fields in one
/// transaction. `image` replaces the stored path when given.
pub fn update_recipe(
    conn: &mut Connection,
    recipe_id: i64,
    image: Option<&str>,
    fields: &RecipeFields,
) -> Result<(), rusqlite::Error> {
    let tx = conn.transaction()?;

    tx.execute(
        "DELETE FROM tag_recipes WHERE recipe_id = ?1",
        params![recipe_id],
    )?;
    tx.execute(
        "DELETE FROM ingredient_recipes WHERE recipe_id = ?1",
        params![recipe_id],
    )?;

    add_tags_and_ingredients(&tx, recipe_id, &fields.tags, &fields.ingredients)?;

    tx.execute(
        "UPDATE recipes SET name = ?1, text = ?2, cooking_time = ?3, image = COALESCE(?4, image)
         WHERE id = ?5",
        params![fields.name, fields.text, fields.cooking_time, image, recipe_id],
    )?;

    tx.commit()?;
    tracing::debug!(recipe_id, "Updated recipe");
    Ok(())
}

pub fn delete_recipe(conn: &Connection, recipe_id: i64) -> Result<bool, rusqlite::Error> {
    let deleted = conn.execute("DELETE FROM recipes WHERE id = ?1", params![recipe_id])?;
    Ok(deleted > 0)
}

pub fn find_recipe(conn: &Connection, recipe_id: i64) -> Result<Option<Recipe>, rusqlite::Error> {
    conn.query_row(
        &format!("SELECT {} FROM recipes WHERE id = ?1", Recipe::COLUMNS),
        params![recipe_id],
        Recipe::from_row,
    )
    .optional()
}

pub fn recipe_tags(conn: &Connection, recipe_id: i64) -> Result<Vec<Tag>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.slug, t.color
         FROM tag_recipes tr
         JOIN tags t ON t.id = tr.tag_id
         WHERE tr.recipe_id = ?1
         ORDER BY t.id",
    )?;
    let tags = stmt
        .query_map(params![recipe_id], Tag::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

pub fn recipe_ingredients(
    conn: &Connection,
    recipe_id: i64,
) -> Result<Vec<IngredientAmount>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.name, i.measurement_unit, ir.amount
         FROM ingredient_recipes ir
         JOIN ingredients i ON i.id = ir.ingredient_id
         WHERE ir.recipe_id = ?1
         ORDER BY ir.id",
    )?;
    let items = stmt
        .query_map(params![recipe_id], |row| {
            Ok(IngredientAmount {
                id: row.get(0)?,
                name: row.get(1)?,
                measurement_unit: row.get(2)?,
                amount: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

/// WHERE clause and bound values for a recipe list query.
fn filter_clause(filter: &RecipeFilter, viewer: Option<i64>) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(author) = filter.author {
        clauses.push("r.author_id = ?".to_string());
        values.push(Value::Integer(author));
    }

    if !filter.tags.is_empty() {
        let placeholders = vec!["?"; filter.tags.len()].join(", ");
        clauses.push(format!(
            "EXISTS (SELECT 1 FROM tag_recipes tr JOIN tags t ON t.id = tr.tag_id
                     WHERE tr.recipe_id = r.id AND t.slug IN ({}))",
            placeholders
        ));
        values.extend(filter.tags.iter().cloned().map(Value::Text));
    }

    let collections = [
        (filter.is_favorited, RecipeCollection::Favorites),
        (filter.is_in_shopping_cart, RecipeCollection::ShoppingCart),
    ];
    for (wanted, collection) in collections {
        if !wanted {
            continue;
        }
        match viewer {
            Some(user_id) => {
                clauses.push(collection.membership_clause());
                values.push(Value::Integer(user_id));
            }
            // Anonymous viewers have empty collections.
            None => clauses.push("0".to_string()),
        }
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!("WHERE {}", clauses.join(" AND ")), values)
    }
}

/// Newest-first recipe page matching `filter`, plus the total match count.
pub fn list_recipes(
    conn: &Connection,
    filter: &RecipeFilter,
    viewer: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Recipe>, i64), rusqlite::Error> {
    let (clause, values) = filter_clause(filter, viewer);

    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM recipes r {}", clause),
        params_from_iter(values.iter()),
        |r| r.get(0),
    )?;

    let columns = Recipe::COLUMNS
        .split(", ")
        .map(|c| format!("r.{}", c))
        .collect::<Vec<_>>()
        .join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM recipes r {} ORDER BY r.pub_date DESC, r.id DESC LIMIT ? OFFSET ?",
        columns, clause
    ))?;

    let mut bound = values;
    bound.push(Value::Integer(limit));
    bound.push(Value::Integer(offset));

    let recipes = stmt
        .query_map(params_from_iter(bound.iter()), Recipe::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok((recipes, count))
}

/// An author's recipes in id order, optionally cut to `limit`.
pub fn author_recipes(
    conn: &Connection,
    author_id: i64,
    limit: Option<u32>,
) -> Result<Vec<Recipe>, rusqlite::Error> {
    // SQLite treats a negative LIMIT as unbounded.
    let limit = limit.map(i64::from).unwrap_or(-1);
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM recipes WHERE author_id = ?1 ORDER BY id LIMIT ?2",
        Recipe::COLUMNS
    ))?;
    let recipes = stmt
        .query_map(params![author_id, limit], Recipe::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(recipes)
}

pub fn count_author_recipes(conn: &Connection, author_id: i64) -> Result<i64, rusqlite::Error> {
    conn.query_row(
        "SELECT COUNT(*) FROM recipes WHERE author_id = ?1",
        params![author_id],
        |r| r.get(0),
    )
}

/// One line of a shopping list: an ingredient and its total amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Amounts of every ingredient across the user's cart, summed per
/// (name, unit) and sorted by name.
pub fn shopping_list(conn: &Connection, user_id: i64) -> Result<Vec<ShoppingItem>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT i.name, i.measurement_unit, SUM(ir.amount)
         FROM carts c
         JOIN ingredient_recipes ir ON ir.recipe_id = c.recipe_id
         JOIN ingredients i ON i.id = ir.ingredient_id
         WHERE c.user_id = ?1
         GROUP BY i.name, i.measurement_unit
         ORDER BY i.name, i.measurement_unit",
    )?;
    let items = stmt
        .query_map(params![user_id], |row| {
            Ok(ShoppingItem {
                name: row.get(0)?,
                measurement_unit: row.get(1)?,
                amount: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}
