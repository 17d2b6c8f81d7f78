pub mod app;
pub mod config;
pub mod feed;
pub mod import;
pub mod models;
pub mod reconcile;
pub mod store;
