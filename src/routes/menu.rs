use axum::{
    routing::{get, post},
    Router,
};
use crate::state::AppState;
use crate::handlers::menu::{list_menu, create_menu_item};
use crate::handlers::review::list_reviews;
use crate::middleware::auth::{guard, Access};

pub fn routes(state: &AppState) -> Router<AppState> {
    // Browsing the menu and reviews is open
    let open_routes = Router::new()
        .route("/menu", get(list_menu))
        .route("/reviews", get(list_reviews));

    // Only admins can change the menu
    let admin_routes = Router::new()
        .route("/menu", post(create_menu_item));

    open_routes.merge(guard(admin_routes, state, Access::Admin))
}
