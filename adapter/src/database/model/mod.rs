pub mod destination;
pub mod user;
