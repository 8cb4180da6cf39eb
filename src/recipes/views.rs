use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::models::{IngredientAmount, Recipe, Tag};
use crate::error::{AppError, AppResult};
use crate::media;
use crate::recipes::collections::{is_favorited, is_in_shopping_cart};
use crate::recipes::repository::{self, ShoppingItem};
use crate::users::repository as user_repo;
use crate::users::views::UserView;

#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<IngredientAmount>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
}

/// Compact form used by favorites, the cart, and subscription listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeShort {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

impl From<Recipe> for RecipeShort {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: media::media_url(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Full recipe rendering with membership flags resolved for `viewer`.
pub fn recipe_view(conn: &Connection, recipe: Recipe, viewer: Option<i64>) -> AppResult<RecipeView> {
    let author = user_repo::find_user(conn, recipe.author_id)?
        .ok_or_else(|| AppError::Internal(format!("Recipe {} has no author", recipe.id)))?;

    Ok(RecipeView {
        id: recipe.id,
        tags: repository::recipe_tags(conn, recipe.id)?,
        author: user_repo::user_view(conn, author, viewer)?,
        ingredients: repository::recipe_ingredients(conn, recipe.id)?,
        is_favorited: is_favorited(conn, viewer, recipe.id)?,
        is_in_shopping_cart: is_in_shopping_cart(conn, viewer, recipe.id)?,
        name: recipe.name,
        image: media::media_url(&recipe.image),
        text: recipe.text,
        cooking_time: recipe.cooking_time,
    })
}

/// Plain-text shopping list, one ingredient per line.
pub fn render_shopping_list(items: &[ShoppingItem], date: NaiveDate) -> String {
    let mut out = format!("Список покупок ({})\n\n", date.format("%d.%m.%Y"));
    if items.is_empty() {
        out.push_str("Список пуст.\n");
        return out;
    }
    for (n, item) in items.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({}) - {}\n",
            n + 1,
            item.name,
            item.measurement_unit,
            item.amount
        ));
    }
    out
}
