use axum::{
    routing::{delete, get},
    Router,
};
use crate::state::AppState;
use crate::handlers::cart::{list_cart, add_to_cart, remove_from_cart};
use crate::middleware::auth::{guard, Access};

pub fn routes(state: &AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .route("/carts", get(list_cart).post(add_to_cart))
        .route("/carts/{id}", delete(remove_from_cart));

    guard(protected_routes, state, Access::Authenticated)
}
