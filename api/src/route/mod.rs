pub mod auth;
pub mod destination;
pub mod health;
pub mod place;
pub mod user;
pub mod v1;
