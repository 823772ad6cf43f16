//! Interview pipelines: per-application stage tracking with a derived
//! process status.

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod schedule;
pub mod tracker;
pub mod transitions;
