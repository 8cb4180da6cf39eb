use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::catalog;
use crate::db::models::{Ingredient, Tag};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct IngredientSearch {
    pub name: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tags/", get(list_tags))
        .route("/api/tags/{id}/", get(get_tag))
        .route("/api/ingredients/", get(list_ingredients))
        .route("/api/ingredients/{id}/", get(get_ingredient))
}

async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    let conn = state.db.get()?;
    Ok(Json(catalog::list_tags(&conn)?))
}

async fn get_tag(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Tag>> {
    let conn = state.db.get()?;
    catalog::find_tag(&conn, id)?
        .map(Json)
        .ok_or(AppError::NotFound)
}

async fn list_ingredients(
    State(state): State<AppState>,
    Query(search): Query<IngredientSearch>,
) -> AppResult<Json<Vec<Ingredient>>> {
    let conn = state.db.get()?;
    Ok(Json(catalog::list_ingredients(&conn, search.name.as_deref())?))
}

async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Ingredient>> {
    let conn = state.db.get()?;
    catalog::find_ingredient(&conn, id)?
        .map(Json)
        .ok_or(AppError::NotFound)
}
