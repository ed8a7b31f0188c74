use axum::{extract::State, Json};
use serde_json::Value;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;
use crate::store::{Collection, Document, Filter};

// GET /reviews
#[instrument(skip(state))]
pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let reviews = state.store.find(Collection::Reviews, &Filter::all()).await?;
    Ok(Json(reviews.into_iter().map(Document::into_json).collect()))
}
