pub mod auth;
pub mod catalog;
pub mod media;
pub mod recipes;
pub mod users;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application: every API router plus media serving, with request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(catalog::router())
        .merge(recipes::router())
        .route("/media/{*path}", get(media::serve))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
