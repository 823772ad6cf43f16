pub mod candidate;
pub mod employer;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod scorer;
