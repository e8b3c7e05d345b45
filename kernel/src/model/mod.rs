pub mod auth;
pub mod destination;
pub mod facility;
pub mod id;
pub mod list;
pub mod place;
pub mod role;
pub mod user;
