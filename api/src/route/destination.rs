use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::destination::{
    add_review, delete_destination, import_destination, register_destination, show_destination,
    show_destination_list, update_destination,
};

pub fn build_destination_routers() -> Router<AppRegistry> {
    let destinations_routers = Router::new()
        .route("/", post(register_destination))
        .route("/", get(show_destination_list))
        .route("/import", post(import_destination))
        .route("/:destination_id", get(show_destination))
        .route("/:destination_id", put(update_destination))
        .route("/:destination_id", delete(delete_destination))
        .route("/:destination_id/reviews", post(add_review));

    Router::new().nest("/destinations", destinations_routers)
}
