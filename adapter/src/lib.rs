pub mod database;
pub mod places;
pub mod redis;
pub mod repository;
