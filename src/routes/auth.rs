use axum::{routing::post, Router};
use crate::state::AppState;
use crate::handlers::auth::issue_token;

pub fn routes() -> Router<AppState> {
    Router::new().route("/jwt", post(issue_token))
}
