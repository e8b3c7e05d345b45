pub mod auth;
pub mod destination;
pub mod favorite;
pub mod health;
pub mod place;
pub mod user;
