//! Application configuration loaded from files and `APP__*` environment variables

mod app_config;

pub use app_config::{
    AppConfig, Environment, LogFormat, LoggingConfig, ServerConfig, StorageConfig, UiConfig,
    MAX_PRESIGN_EXPIRY_SECS,
};
