/// Application settings from config.toml and the environment
pub mod app;
/// Option lists for selector fields
pub mod catalog;
/// Database connection and table creation
pub mod database;

pub use app::{AppConfig, load_app_config};
pub use catalog::Catalog;
