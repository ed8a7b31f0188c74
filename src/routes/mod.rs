pub mod auth;
pub mod carts;
pub mod menu;
pub mod users;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::state::AppState;

pub fn create_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Bistro Boss server is running" }))
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(users::routes(state))
        .merge(menu::routes(state))
        .merge(carts::routes(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}
