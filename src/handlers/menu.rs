// src/handlers/menu.rs
use axum::{extract::State, Json};
use serde_json::Value;
use tracing::instrument;

use crate::dtos::document::{InsertResult, JsonObject};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::{Collection, Document, Filter};

// GET /menu - List all menu items
#[instrument(skip(state))]
pub async fn list_menu(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let items = state.store.find(Collection::Menu, &Filter::all()).await?;
    Ok(Json(items.into_iter().map(Document::into_json).collect()))
}

// POST /menu - Add a menu item (admin)
#[instrument(skip(state, item))]
pub async fn create_menu_item(
    State(state): State<AppState>,
    JsonObject(item): JsonObject,
) -> Result<Json<InsertResult>, AppError> {
    let id = state.store.insert_one(Collection::Menu, item).await?;
    Ok(Json(InsertResult::inserted(id)))
}
