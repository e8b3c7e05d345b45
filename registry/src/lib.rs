use std::sync::Arc;

use adapter::places::PlaceRepositoryImpl;
use adapter::redis::RedisClient;
use adapter::repository::{
    auth::AuthRepositoryImpl, destination::DestinationRepositoryImpl,
    favorite::FavoriteRepositoryImpl, health::HealthCheckRepositoryImpl,
    user::UserRepositoryImpl,
};
use adapter::database::ConnectionPool;
use kernel::repository::{
    auth::AuthRepository, destination::DestinationRepository, favorite::FavoriteRepository,
    health::HealthCheckRepository, place::PlaceRepository, user::UserRepository,
};
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    destination_repository: Arc<dyn DestinationRepository>,
    favorite_repository: Arc<dyn FavoriteRepository>,
    place_repository: Arc<dyn PlaceRepository>,
    user_repository: Arc<dyn UserRepository>,
    auth_repository: Arc<dyn AuthRepository>,
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        redis_client: Arc<RedisClient>,
        app_config: AppConfig,
    ) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let destination_repository = Arc::new(DestinationRepositoryImpl::new(pool.clone()));
        let favorite_repository = Arc::new(FavoriteRepositoryImpl::new(pool.clone()));
        let place_repository = Arc::new(PlaceRepositoryImpl::new(app_config.places.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            redis_client.clone(),
            app_config.auth.ttl,
        ));
        Self {
            health_check_repository,
            destination_repository,
            favorite_repository,
            place_repository,
            user_repository,
            auth_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn destination_repository(&self) -> Arc<dyn DestinationRepository> {
        self.destination_repository.clone()
    }

    pub fn favorite_repository(&self) -> Arc<dyn FavoriteRepository> {
        self.favorite_repository.clone()
    }

    pub fn place_repository(&self) -> Arc<dyn PlaceRepository> {
        self.place_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }
}
