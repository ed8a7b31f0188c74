use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use crate::state::AppState;
use crate::handlers::user::{list_users, create_user, get_admin_status, make_admin, delete_user};
use crate::middleware::auth::{guard, Access};

pub fn routes(state: &AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/users", post(create_user));

    // Callers may only ask about their own admin status. The segment is an
    // email here and a user id on PATCH; the router needs one name for both.
    let authenticated = Router::new()
        .route("/users/admin/{target}", get(get_admin_status));

    let admin = Router::new()
        .route("/users", get(list_users))
        .route("/users/admin/{target}", patch(make_admin))
        .route("/users/{id}", delete(delete_user));

    open.merge(guard(authenticated, state, Access::Authenticated))
        .merge(guard(admin, state, Access::Admin))
}
