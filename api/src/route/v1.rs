use super::{
    auth::build_auth_routers, destination::build_destination_routers,
    health::build_health_check_routers, place::build_place_routers, user::build_user_router,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_auth_routers())
        .merge(build_destination_routers())
        .merge(build_place_routers())
        .merge(build_user_router());
    Router::new().nest("/api/v1", router)
}
