// src/lib.rs

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod pages;
pub mod storage;
pub mod store;
pub mod timer;
pub mod workflow;

// Re-export specific items for convenience if needed
pub use error::AppError;
