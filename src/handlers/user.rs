use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::Value;
use tracing::{info, instrument};

use crate::auth::roles::{is_admin, ADMIN_ROLE};
use crate::dtos::document::{parse_id, DeleteResult, InsertResult, JsonObject, UpdateResult};
use crate::dtos::user::{AdminStatusResponse, UserExistsResponse};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;
use crate::store::{Collection, Document, Filter};

// GET /users - List all users (admin)
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let users = state.store.find(Collection::Users, &Filter::all()).await?;
    Ok(Json(users.into_iter().map(Document::into_json).collect()))
}

// GET /users/admin/{email} - Whether the caller is an admin
#[instrument(skip(state, auth))]
pub async fn get_admin_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatusResponse>, AppError> {
    auth.ensure_self(Some(&email))?;
    let admin = is_admin(state.store.as_ref(), &email).await?;
    Ok(Json(AdminStatusResponse { admin }))
}

// POST /users - Register a user unless the email is already known
#[instrument(skip(state, user))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonObject(mut user): JsonObject,
) -> Result<Response, AppError> {
    let email = match user.get("email").and_then(Value::as_str) {
        Some(email) if !email.is_empty() => email.to_string(),
        _ => return Err(AppError::validation("Email is required")),
    };

    // Roles are only granted through PATCH /users/admin/{id}.
    user.remove("role");

    if state.store.find_one(Collection::Users, &Filter::by_email(&email)).await?.is_some() {
        return Ok(Json(UserExistsResponse::default()).into_response());
    }

    let id = state.store.insert_one(Collection::Users, user).await?;
    info!(id, "registered user");
    Ok(Json(InsertResult::inserted(id)).into_response())
}

// PATCH /users/admin/{id} - Promote a user to admin (admin)
#[instrument(skip(state))]
pub async fn make_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, AppError> {
    let id = parse_id(&id)?;
    let outcome = state
        .store
        .set_field(Collection::Users, &Filter::by_id(id), "role", Value::from(ADMIN_ROLE))
        .await?;
    info!(id, modified = outcome.modified, "promoted user to admin");
    Ok(Json(outcome.into()))
}

// DELETE /users/{id} - Remove a user (admin)
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let id = parse_id(&id)?;
    let deleted = state.store.delete_one(Collection::Users, &Filter::by_id(id)).await?;
    Ok(Json(DeleteResult::deleted(deleted)))
}
