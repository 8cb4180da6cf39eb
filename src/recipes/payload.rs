use serde::Deserialize;

use crate::media::DecodedImage;

/// One `{id, amount}` entry of a recipe write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IngredientAmountInput {
    pub id: i64,
    pub amount: i64,
}

/// Body of POST and PATCH `/api/recipes/`.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeWrite {
    pub ingredients: Option<Vec<IngredientAmountInput>>,
    pub tags: Option<Vec<i64>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

/// Validated scalar fields and relation sets of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFields {
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
    pub tags: Vec<i64>,
    pub ingredients: Vec<IngredientAmountInput>,
}

#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub fields: RecipeFields,
    /// Absent only on updates that keep the current image.
    pub image: Option<DecodedImage>,
}

/// Query filters of the recipe list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<i64>,
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

fn truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "True")
}

impl RecipeFilter {
    /// Build from raw query pairs so repeated `tags` keys are kept.
    /// Malformed values are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "author" => filter.author = value.parse().ok(),
                "tags" if !value.is_empty() => filter.tags.push(value.clone()),
                "is_favorited" => filter.is_favorited = truthy(value),
                "is_in_shopping_cart" => filter.is_in_shopping_cart = truthy(value),
                _ => {}
            }
        }
        filter
    }
}
