use std::collections::HashSet;

use rusqlite::{params, Connection};

use crate::error::{AppResult, ValidationErrors};
use crate::media;
use crate::recipes::payload::{IngredientAmountInput, RecipeDraft, RecipeFields, RecipeWrite};
use crate::users::validation::REQUIRED;

pub const AMOUNT_TOO_SMALL: &str = "Количество должно быть равным или больше 1!";
pub const AMOUNT_TOO_LARGE: &str = "Количество должно быть не больше 32767!";
pub const UNKNOWN_INGREDIENT: &str = "Данного продукта нет в базе!";
pub const DUPLICATE_INGREDIENT: &str = "Эти продукты уже были в рецепте!";
pub const NO_INGREDIENTS: &str = "Нужен хотя бы один ингредиент!";
pub const DUPLICATE_TAG: &str = "Теги не должны повторяться!";
pub const COOKING_TIME_TOO_SMALL: &str = "Время приготовления должно быть не меньше 1 минуты!";
pub const INVALID_IMAGE: &str =
    "Загрузите правильное изображение. Файл, который вы загрузили, поврежден или не является изображением.";

pub const NAME_MAX: usize = 200;
/// Upper bound of an ingredient amount, the range of a small integer column.
pub const AMOUNT_MAX: i64 = 32767;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Check ingredient entries in submission order and report the first problem:
/// an amount outside `1..=AMOUNT_MAX`, an id `exists` rejects, or an id seen earlier.
pub fn check_ingredients<F>(
    items: &[IngredientAmountInput],
    mut exists: F,
) -> Result<Option<&'static str>, rusqlite::Error>
where
    F: FnMut(i64) -> Result<bool, rusqlite::Error>,
{
    if items.is_empty() {
        return Ok(Some(NO_INGREDIENTS));
    }

    let mut seen = HashSet::new();
    for item in items {
        if item.amount < 1 {
            return Ok(Some(AMOUNT_TOO_SMALL));
        }
        if item.amount > AMOUNT_MAX {
            return Ok(Some(AMOUNT_TOO_LARGE));
        }
        if !exists(item.id)? {
            return Ok(Some(UNKNOWN_INGREDIENT));
        }
        if !seen.insert(item.id) {
            return Ok(Some(DUPLICATE_INGREDIENT));
        }
    }
    Ok(None)
}

/// Tags must exist and must not repeat.
pub fn check_tags<F>(ids: &[i64], mut exists: F) -> Result<Option<String>, rusqlite::Error>
where
    F: FnMut(i64) -> Result<bool, rusqlite::Error>,
{
    let mut seen = HashSet::new();
    for &id in ids {
        if !exists(id)? {
            return Ok(Some(format!("Тега с id={} нет в базе!", id)));
        }
        if !seen.insert(id) {
            return Ok(Some(DUPLICATE_TAG.to_string()));
        }
    }
    Ok(None)
}

fn ingredient_exists(conn: &Connection, id: i64) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM ingredients WHERE id = ?1)",
        params![id],
        |r| r.get(0),
    )
}

fn tag_exists(conn: &Connection, id: i64) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tags WHERE id = ?1)",
        params![id],
        |r| r.get(0),
    )
}

fn required_text(errors: &mut ValidationErrors, field: &str, value: &Option<String>) -> String {
    let value = value.as_deref().map(str::trim).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    }
    value.to_string()
}

/// Validate a recipe write against the database. Every field is checked and
/// all problems are reported together, keyed by field name.
pub fn validate_recipe(
    conn: &Connection,
    payload: &RecipeWrite,
    mode: WriteMode,
) -> AppResult<RecipeDraft> {
    let mut errors = ValidationErrors::new();

    let name = required_text(&mut errors, "name", &payload.name);
    if name.chars().count() > NAME_MAX {
        errors.add(
            "name",
            format!("Убедитесь, что это значение содержит не более {} символов.", NAME_MAX),
        );
    }
    let text = required_text(&mut errors, "text", &payload.text);

    let cooking_time = match payload.cooking_time {
        None => {
            errors.add("cooking_time", REQUIRED);
            0
        }
        Some(t) if t < 1 => {
            errors.add("cooking_time", COOKING_TIME_TOO_SMALL);
            t
        }
        Some(t) => t,
    };

    let image = match payload.image.as_deref() {
        None | Some("") if mode == WriteMode::Create => {
            errors.add("image", REQUIRED);
            None
        }
        None | Some("") => None,
        Some(data) => match media::decode_image(data) {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::debug!("Rejected recipe image: {}", e);
                errors.add("image", INVALID_IMAGE);
                None
            }
        },
    };

    let ingredients = match &payload.ingredients {
        None => {
            errors.add("ingredients", REQUIRED);
            Vec::new()
        }
        Some(items) => {
            if let Some(msg) = check_ingredients(items, |id| ingredient_exists(conn, id))? {
                errors.add("ingredients", msg);
            }
            items.clone()
        }
    };

    let tags = match &payload.tags {
        None => {
            errors.add("tags", REQUIRED);
            Vec::new()
        }
        Some(ids) => {
            if let Some(msg) = check_tags(ids, |id| tag_exists(conn, id))? {
                errors.add("tags", msg);
            }
            ids.clone()
        }
    };

    errors.into_result()?;

    Ok(RecipeDraft {
        fields: RecipeFields {
            name,
            text,
            cooking_time,
            tags,
            ingredients,
        },
        image,
    })
}
