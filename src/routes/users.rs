use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::password;
use crate::error::{AppError, AppResult, ValidationErrors};
use crate::extractors::{CurrentUser, JsonBody, MaybeUser};
use crate::pagination::{Page, PageParams, Pagination};
use crate::state::AppState;
use crate::users::repository as repo;
use crate::users::validation::{self, RegisterRequest, REQUIRED};
use crate::users::views::{RegisteredUser, SubscriptionView, UserView};

// --- Forms ---

#[derive(Deserialize)]
pub struct SetPasswordRequest {
    pub new_password: Option<String>,
    pub current_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub recipes_limit: Option<u32>,
}

impl SubscriptionParams {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users/", get(list_users).post(register))
        .route("/api/users/me/", get(me))
        .route("/api/users/set_password/", post(set_password))
        .route("/api/users/subscriptions/", get(subscriptions))
        .route("/api/users/{id}/", get(get_user))
        .route(
            "/api/users/{id}/subscribe/",
            post(subscribe).delete(unsubscribe),
        )
}

// --- Handlers ---

async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisteredUser>)> {
    let new_user = validation::validate_registration(&req)?;

    let conn = state.db.get()?;
    repo::uniqueness_errors(&conn, &new_user)?.into_result()?;

    let hash = password::hash_password(&new_user.password, state.config.auth.password_cost)?;
    let user = repo::register_user(&conn, &new_user, &hash)?;
    tracing::info!(user_id = user.id, "Registered user {}", user.username);

    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn list_users(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<UserView>>> {
    let pagination = Pagination::resolve(params, state.config.api.page_size);
    let conn = state.db.get()?;

    let count = repo::count_users(&conn)?;
    let users = repo::list_users(&conn, pagination.limit(), pagination.offset())?
        .into_iter()
        .map(|user| repo::user_view(&conn, user, viewer.id()))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(Page::new(users, count, pagination)))
}

async fn get_user(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UserView>> {
    let conn = state.db.get()?;
    let user = repo::find_user(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(Json(repo::user_view(&conn, user, viewer.id())?))
}

async fn me(State(state): State<AppState>, user: CurrentUser) -> AppResult<Json<UserView>> {
    let conn = state.db.get()?;
    let me = repo::find_user(&conn, user.id)?.ok_or(AppError::Unauthorized)?;
    Ok(Json(repo::user_view(&conn, me, Some(user.id))?))
}

async fn set_password(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(req): JsonBody<SetPasswordRequest>,
) -> AppResult<StatusCode> {
    let mut errors = ValidationErrors::new();
    let new_password = req.new_password.unwrap_or_default();
    let current_password = req.current_password.unwrap_or_default();
    if new_password.is_empty() {
        errors.add("new_password", REQUIRED);
    }
    if current_password.is_empty() {
        errors.add("current_password", REQUIRED);
    }
    errors.into_result()?;

    let conn = state.db.get()?;
    let hash = repo::password_hash(&conn, user.id)?;
    if !password::verify_password(&current_password, &hash) {
        return Err(ValidationErrors::single("current_password", "Неверный пароль.").into());
    }

    let new_hash = password::hash_password(&new_password, state.config.auth.password_cost)?;
    repo::set_password_hash(&conn, user.id, &new_hash)?;
    tracing::info!(user_id = user.id, "Changed password");

    Ok(StatusCode::NO_CONTENT)
}

async fn subscriptions(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<SubscriptionParams>,
) -> AppResult<Json<Page<SubscriptionView>>> {
    let pagination = Pagination::resolve(params.page_params(), state.config.api.page_size);
    let conn = state.db.get()?;

    let count = repo::count_subscriptions(&conn, user.id)?;
    let results = repo::list_subscriptions(&conn, user.id, pagination.limit(), pagination.offset())?
        .into_iter()
        .map(|author| repo::subscription_view(&conn, author, Some(user.id), params.recipes_limit))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(Page::new(results, count, pagination)))
}

async fn subscribe(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(author_id): Path<i64>,
    Query(params): Query<SubscriptionParams>,
) -> AppResult<(StatusCode, Json<SubscriptionView>)> {
    let conn = state.db.get()?;
    let author = repo::find_user(&conn, author_id)?.ok_or(AppError::NotFound)?;

    if author.id == user.id {
        return Err(AppError::BadRequest(
            "Нельзя подписаться на самого себя!".into(),
        ));
    }
    if !repo::subscribe(&conn, user.id, author.id)? {
        return Err(AppError::BadRequest(
            "Вы уже подписаны на этого автора!".into(),
        ));
    }
    tracing::info!(user_id = user.id, author_id, "Subscribed");

    let view = repo::subscription_view(&conn, author, Some(user.id), params.recipes_limit)?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn unsubscribe(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(author_id): Path<i64>,
) -> AppResult<StatusCode> {
    let conn = state.db.get()?;
    repo::find_user(&conn, author_id)?.ok_or(AppError::NotFound)?;

    if !repo::unsubscribe(&conn, user.id, author_id)? {
        return Err(AppError::BadRequest(
            "Вы не подписаны на этого автора!".into(),
        ));
    }
    tracing::info!(user_id = user.id, author_id, "Unsubscribed");

    Ok(StatusCode::NO_CONTENT)
}
