use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{password, tokens};
use crate::error::{AppError, AppResult, ValidationErrors};
use crate::extractors::{CurrentUser, JsonBody};
use crate::state::AppState;
use crate::users::repository as user_repo;

const BAD_CREDENTIALS: &str = "Невозможно войти с предоставленными учетными данными.";

// -- Request types --

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

// -- Handlers --

/// POST /api/auth/token/login/: exchange email and password for a token
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let conn = state.db.get()?;

    let (user_id, hash) = user_repo::credentials_by_email(&conn, req.email.trim())?
        .ok_or_else(|| AppError::from(ValidationErrors::single("non_field_errors", BAD_CREDENTIALS)))?;

    if !password::verify_password(&req.password, &hash) {
        tracing::info!(user_id, "Rejected login with wrong password");
        return Err(ValidationErrors::single("non_field_errors", BAD_CREDENTIALS).into());
    }

    let auth_token = tokens::create_token(&conn, user_id)?;
    tracing::info!(user_id, "Issued auth token");

    Ok(Json(TokenResponse { auth_token }))
}

/// POST /api/auth/token/logout/: revoke the token used for this request
pub async fn logout(State(state): State<AppState>, user: CurrentUser) -> AppResult<StatusCode> {
    let conn = state.db.get()?;
    tokens::delete_token(&conn, &user.token)?;
    tracing::info!(user_id = user.id, "Revoked auth token");
    Ok(StatusCode::NO_CONTENT)
}
