pub mod account;
pub mod document;
pub mod job;
