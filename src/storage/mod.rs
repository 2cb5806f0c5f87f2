//! Storage module for database and configuration.

pub mod config;
pub mod database;
pub mod schema;

pub use config::{
    get_config_path, get_data_dir, load_config, load_config_from, save_config, save_config_to,
    AppConfig, ConfigError, RunnerGoal, StorageSettings, UserProfile,
};
pub use database::{Database, DatabaseError};
