//! Elevated-role lookups against the `users` collection.

use tracing::debug;

use crate::error::{AppError, Denial};
use crate::store::{Collection, Document, DocumentStore, Filter};

/// Only this exact role value grants admin access.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Role of a stored user record. Anything other than `"admin"`,
    /// including a missing or non-string role, is a plain member.
    pub fn of(user: &Document) -> Role {
        match user.get_str("role") {
            Some(ADMIN_ROLE) => Role::Admin,
            _ => Role::Member,
        }
    }
}

/// Whether the user stored under `email` holds the admin role. An
/// unknown email is not an admin.
pub async fn is_admin(store: &dyn DocumentStore, email: &str) -> Result<bool, AppError> {
    let user = store.find_one(Collection::Users, &Filter::by_email(email)).await?;
    Ok(user.as_ref().map(Role::of) == Some(Role::Admin))
}

pub async fn authorize_admin(store: &dyn DocumentStore, email: &str) -> Result<(), AppError> {
    if is_admin(store, email).await? {
        Ok(())
    } else {
        debug!(%email, "admin check failed");
        Err(AppError::Forbidden(Denial::NotAdmin))
    }
}
