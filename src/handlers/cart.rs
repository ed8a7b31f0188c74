use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use serde_json::Value;
use tracing::instrument;

use crate::dtos::cart::CartQuery;
use crate::dtos::document::{parse_id, DeleteResult, InsertResult, JsonObject};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;
use crate::store::{Collection, Document, Filter};

// GET /carts?email= - The caller's cart
#[instrument(skip(state, auth, query))]
pub async fn list_cart(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    query: Result<Query<CartQuery>, QueryRejection>,
) -> Result<Json<Vec<Value>>, AppError> {
    // An unparseable query (e.g. a repeated `email`) names no single owner.
    let requested = query.ok().and_then(|Query(q)| q.email);
    auth.ensure_self(requested.as_deref())?;
    let items = state.store.find(Collection::Carts, &Filter::by_email(auth.email())).await?;
    Ok(Json(items.into_iter().map(Document::into_json).collect()))
}

// POST /carts - Add an item to the caller's cart
#[instrument(skip(state, auth, item))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    JsonObject(mut item): JsonObject,
) -> Result<Json<InsertResult>, AppError> {
    auth.claim_document(&mut item)?;
    let id = state.store.insert_one(Collection::Carts, item).await?;
    Ok(Json(InsertResult::inserted(id)))
}

// DELETE /carts/{id} - Remove one of the caller's cart items
#[instrument(skip(state, auth))]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let id = parse_id(&id)?;
    let filter = Filter::by_id(id).and_email(auth.email());
    let deleted = state.store.delete_one(Collection::Carts, &filter).await?;
    Ok(Json(DeleteResult::deleted(deleted)))
}
