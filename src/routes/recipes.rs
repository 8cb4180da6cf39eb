use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, JsonBody, MaybeUser};
use crate::media;
use crate::pagination::{Page, PageParams, Pagination};
use crate::recipes::collections::RecipeCollection;
use crate::recipes::payload::{RecipeFilter, RecipeWrite};
use crate::recipes::repository;
use crate::recipes::validation::{validate_recipe, WriteMode};
use crate::recipes::views::{recipe_view, render_shopping_list, RecipeShort, RecipeView};
use crate::state::AppState;

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/recipes/", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/download_shopping_cart/",
            get(download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}/",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/api/recipes/{id}/favorite/",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart/",
            post(add_to_cart).delete(remove_from_cart),
        )
}

// --- Handlers ---

async fn list_recipes(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<Page<RecipeView>>> {
    let filter = RecipeFilter::from_pairs(&pairs);
    let pagination = Pagination::resolve(PageParams::from_pairs(&pairs), state.config.api.page_size);

    let conn = state.db.get()?;
    let (recipes, count) = repository::list_recipes(
        &conn,
        &filter,
        viewer.id(),
        pagination.limit(),
        pagination.offset(),
    )?;
    let results = recipes
        .into_iter()
        .map(|recipe| recipe_view(&conn, recipe, viewer.id()))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(Page::new(results, count, pagination)))
}

async fn get_recipe(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<i64>,
) -> AppResult<Json<RecipeView>> {
    let conn = state.db.get()?;
    let recipe = repository::find_recipe(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(Json(recipe_view(&conn, recipe, viewer.id())?))
}

async fn create_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(payload): JsonBody<RecipeWrite>,
) -> AppResult<(StatusCode, Json<RecipeView>)> {
    let mut conn = state.db.get()?;
    let draft = validate_recipe(&conn, &payload, WriteMode::Create)?;
    let image = draft
        .image
        .as_ref()
        .ok_or_else(|| AppError::Internal("Validated recipe has no image".into()))?;

    let image_path = media::store_image(&state.media_dir, image)?;
    let recipe_id = match repository::create_recipe(&mut conn, user.id, &image_path, &draft.fields)
    {
        Ok(id) => id,
        Err(e) => {
            media::remove_image(&state.media_dir, &image_path);
            return Err(e.into());
        }
    };
    tracing::info!(recipe_id, author_id = user.id, "Recipe created");

    let recipe = repository::find_recipe(&conn, recipe_id)?.ok_or(AppError::NotFound)?;
    let view = recipe_view(&conn, recipe, Some(user.id))?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<RecipeWrite>,
) -> AppResult<Json<RecipeView>> {
    let mut conn = state.db.get()?;
    let existing = repository::find_recipe(&conn, id)?.ok_or(AppError::NotFound)?;
    if existing.author_id != user.id {
        return Err(AppError::Forbidden);
    }

    let draft = validate_recipe(&conn, &payload, WriteMode::Update)?;
    let new_image = match &draft.image {
        Some(image) => Some(media::store_image(&state.media_dir, image)?),
        None => None,
    };

    if let Err(e) = repository::update_recipe(&mut conn, id, new_image.as_deref(), &draft.fields) {
        if let Some(path) = &new_image {
            media::remove_image(&state.media_dir, path);
        }
        return Err(e.into());
    }
    if new_image.is_some() {
        media::remove_image(&state.media_dir, &existing.image);
    }
    tracing::info!(recipe_id = id, "Recipe updated");

    let recipe = repository::find_recipe(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(Json(recipe_view(&conn, recipe, Some(user.id))?))
}

async fn delete_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let conn = state.db.get()?;
    let recipe = repository::find_recipe(&conn, id)?.ok_or(AppError::NotFound)?;
    if recipe.author_id != user.id {
        return Err(AppError::Forbidden);
    }

    repository::delete_recipe(&conn, id)?;
    media::remove_image(&state.media_dir, &recipe.image);
    tracing::info!(recipe_id = id, "Recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn add_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<RecipeShort>)> {
    add_to_collection(&state, &user, id, RecipeCollection::Favorites)
}

async fn remove_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    remove_from_collection(&state, &user, id, RecipeCollection::Favorites)
}

async fn add_to_cart(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<RecipeShort>)> {
    add_to_collection(&state, &user, id, RecipeCollection::ShoppingCart)
}

async fn remove_from_cart(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    remove_from_collection(&state, &user, id, RecipeCollection::ShoppingCart)
}

async fn download_shopping_cart(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Response> {
    let items = {
        let conn = state.db.get()?;
        repository::shopping_list(&conn, user.id)?
    };
    let body = render_shopping_list(&items, Utc::now().date_naive());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_list.txt\"",
            ),
        ],
        body,
    )
        .into_response())
}

// --- Collection helpers ---

fn add_to_collection(
    state: &AppState,
    user: &CurrentUser,
    recipe_id: i64,
    collection: RecipeCollection,
) -> AppResult<(StatusCode, Json<RecipeShort>)> {
    let conn = state.db.get()?;
    let recipe = repository::find_recipe(&conn, recipe_id)?.ok_or(AppError::NotFound)?;

    if !collection.add(&conn, user.id, recipe_id)? {
        return Err(AppError::BadRequest(
            collection.already_added_message().into(),
        ));
    }
    tracing::debug!(user_id = user.id, recipe_id, ?collection, "Added recipe");

    Ok((StatusCode::CREATED, Json(RecipeShort::from(recipe))))
}

fn remove_from_collection(
    state: &AppState,
    user: &CurrentUser,
    recipe_id: i64,
    collection: RecipeCollection,
) -> AppResult<StatusCode> {
    let conn = state.db.get()?;
    repository::find_recipe(&conn, recipe_id)?.ok_or(AppError::NotFound)?;

    if !collection.remove(&conn, user.id, recipe_id)? {
        return Err(AppError::BadRequest(collection.missing_message().into()));
    }
    tracing::debug!(user_id = user.id, recipe_id, ?collection, "Removed recipe");

    Ok(StatusCode::NO_CONTENT)
}
