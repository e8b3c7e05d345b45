use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::place::show_place_photo;

pub fn build_place_routers() -> Router<AppRegistry> {
    let places_routers = Router::new().route("/photo", get(show_place_photo));

    Router::new().nest("/places", places_routers)
}
