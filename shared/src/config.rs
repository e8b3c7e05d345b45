use anyhow::{Context, Result};

const DEFAULT_PLACES_API_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub places: PlacesConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST").context("DATABASE_HOST is not set")?,
            port: std::env::var("DATABASE_PORT")
                .context("DATABASE_PORT is not set")?
                .parse()?,
            username: std::env::var("DATABASE_USERNAME").context("DATABASE_USERNAME is not set")?,
            password: std::env::var("DATABASE_PASSWORD").context("DATABASE_PASSWORD is not set")?,
            database: std::env::var("DATABASE_NAME").context("DATABASE_NAME is not set")?,
        };
        let redis = RedisConfig {
            host: std::env::var("REDIS_HOST").context("REDIS_HOST is not set")?,
            port: std::env::var("REDIS_PORT")
                .context("REDIS_PORT is not set")?
                .parse()?,
        };
        let auth = AuthConfig {
            ttl: std::env::var("AUTH_TOKEN_TTL")
                .context("AUTH_TOKEN_TTL is not set")?
                .parse()?,
        };
        let places = PlacesConfig {
            base_url: std::env::var("PLACES_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PLACES_API_BASE_URL.into()),
            api_key: std::env::var("PLACES_API_KEY").context("PLACES_API_KEY is not set")?,
        };
        let server = ServerConfig {
            port: match std::env::var("PORT") {
                Ok(port) => port.parse()?,
                Err(_) => 8080,
            },
        };
        Ok(Self {
            database,
            redis,
            auth,
            places,
            server,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

pub struct AuthConfig {
    // seconds
    pub ttl: u64,
}

#[derive(Clone)]
pub struct PlacesConfig {
    pub base_url: String,
    pub api_key: String,
}

pub struct ServerConfig {
    pub port: u16,
}
