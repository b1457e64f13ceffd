pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod profile;
pub mod reviews;
pub mod search;
pub mod session;
pub mod state;
pub mod store;
pub mod subscription;
