pub mod auth;
pub mod builder;
pub mod cache;
pub mod components;
pub mod document;
pub mod error;
pub mod gateway;
pub mod kanban;
pub mod models;
pub mod openapi;
pub mod repo;
pub mod routes;
pub mod security;
pub mod site;
pub mod storage;

// Re-export commonly used items for tests / external users
pub use routes::{config, AppState};
pub use security::SecurityHeaders;
