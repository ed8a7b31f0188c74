// src/middleware/auth.rs
//! Gates in front of protected routes.
//!
//! A protected request passes `require_auth` (credential check) and, for
//! admin routes, `require_admin` (role lookup) before its handler runs.
//! Any failure ends the request there.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{Map, Value};

use crate::auth::{roles::authorize_admin, Claims};
use crate::error::{AppError, Denial, Rejection};
use crate::state::AppState;

/// Verified identity of the caller, attached by `require_auth`.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub claims: Claims,
}

impl AuthContext {
    pub fn email(&self) -> &str {
        &self.claims.email
    }

    /// Self-access-only policy: the caller may only address resources keyed
    /// by its own verified email. A missing target email is refused too.
    pub fn ensure_self(&self, requested: Option<&str>) -> Result<(), AppError> {
        match requested {
            Some(email) if email == self.email() => Ok(()),
            _ => Err(AppError::Forbidden(Denial::NotSelf)),
        }
    }

    /// Applies the self-access policy to a JSON body: a body without an
    /// email is stamped with the caller's, a foreign email is refused.
    pub fn claim_document(&self, body: &mut Map<String, Value>) -> Result<(), AppError> {
        match body.get("email") {
            None | Some(Value::Null) => {
                body.insert("email".to_string(), Value::String(self.email().to_string()));
                Ok(())
            }
            Some(other) => self.ensure_self(other.as_str()),
        }
    }
}

/// Gate level a route group sits behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    Admin,
}

/// Puts `routes` behind the gates `access` requires. The credential check
/// is always the outermost layer so it runs first.
pub fn guard(routes: Router<AppState>, state: &AppState, access: Access) -> Router<AppState> {
    let routes = match access {
        Access::Admin => routes.route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        Access::Authenticated => routes,
    };
    routes.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let header = match req.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(h) => Some(h),
            Err(_) => return AppError::Unauthorized(Rejection::MalformedHeader).into_response(),
        },
    };

    let claims = match state.tokens.verify_bearer(header) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    // Attach context
    req.extensions_mut().insert(AuthContext { claims });

    next.run(req).await
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(email) = req.extensions().get::<AuthContext>().map(|auth| auth.email().to_string()) else {
        return AppError::Unauthorized(Rejection::MissingHeader).into_response();
    };

    if let Err(e) = authorize_admin(state.store.as_ref(), &email).await {
        return e.into_response();
    }

    next.run(req).await
}
