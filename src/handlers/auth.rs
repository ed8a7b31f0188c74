use axum::{extract::State, Json};
use tracing::{info, instrument};

use crate::dtos::auth::TokenResponse;
use crate::dtos::document::JsonObject;
use crate::error::AppError;
use crate::state::AppState;

// POST /jwt - Issue a credential for the posted claim
#[instrument(skip(state, claim))]
pub async fn issue_token(
    State(state): State<AppState>,
    JsonObject(claim): JsonObject,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.tokens.issue(claim)?;
    info!("issued access token");
    Ok(Json(TokenResponse { token }))
}
