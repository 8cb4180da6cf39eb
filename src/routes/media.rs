use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::media;
use crate::state::AppState;

/// GET /media/{*path}: serve a stored upload.
pub async fn serve(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let Some(full) = media::resolve(&state.media_dir, &path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&full).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&full).first_or_octet_stream();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
                ],
                bytes,
            )
                .into_response()
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
