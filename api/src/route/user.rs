use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    favorite::{add_favorite, remove_favorite, show_favorite_list},
    user::{change_password, change_role, delete_user, get_current_user, list_users, register_user},
};

pub fn build_user_router() -> Router<AppRegistry> {
    let users_routers = Router::new()
        .route("/", post(register_user))
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
        .route("/me/password", put(change_password))
        .route("/me/favorites", get(show_favorite_list))
        .route("/me/favorites/:destination_id", put(add_favorite))
        .route("/me/favorites/:destination_id", delete(remove_favorite))
        .route("/:user_id/role", put(change_role))
        .route("/:user_id", delete(delete_user));

    Router::new().nest("/users", users_routers)
}
