use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header;
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_path_to_error::Segment;

use crate::auth::tokens;
use crate::error::{AppError, ValidationErrors};
use crate::state::AppState;

pub const NON_FIELD_ERRORS: &str = "non_field_errors";
pub const MALFORMED_BODY: &str = "Некорректный JSON в теле запроса.";
pub const INVALID_VALUE: &str = "Некорректный тип данных.";

/// Represents the currently authenticated user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

/// Extractor that requires authentication.
/// Returns 401 if no valid token is found.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or(AppError::Unauthorized)?;

        let conn = state.db.get()?;
        let (id, username) = tokens::user_for_token(&conn, token)?.ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser {
            id,
            username,
            token: token.to_string(),
        })
    }
}

/// Optional user extractor: `None` when the request carries no token.
/// A token that is present but unknown is still a 401.
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if extract_token(parts).is_none() {
            return Ok(MaybeUser(None));
        }
        let user = CurrentUser::from_request_parts(parts, state).await?;
        Ok(MaybeUser(Some(user)))
    }
}

/// JSON body extractor whose rejections are 400 field errors instead of
/// axum's plain-text 415/422 responses.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                ValidationErrors::single(NON_FIELD_ERRORS, MALFORMED_BODY)
            })?;

        serde_path_to_error::deserialize(value)
            .map(JsonBody)
            .map_err(|e| {
                tracing::debug!("Rejected request field {}: {}", e.path(), e.inner());
                ValidationErrors::single(&field_of(e.path()), INVALID_VALUE).into()
            })
    }
}

/// Top-level field a deserialization error points into.
fn field_of(path: &serde_path_to_error::Path) -> String {
    match path.iter().next() {
        Some(Segment::Map { key }) => key.clone(),
        _ => NON_FIELD_ERRORS.to_string(),
    }
}

/// Reads the key from an `Authorization: Token <key>` header.
fn extract_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, key) = value.trim().split_once(' ')?;
    let key = key.trim();
    if scheme.eq_ignore_ascii_case("token") && !key.is_empty() {
        Some(key)
    } else {
        None
    }
}
