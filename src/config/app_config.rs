use serde::Deserialize;

use crate::infrastructure::observability::ObservabilityConfig;

/// Longest lifetime S3 accepts for a presigned URL (7 days)
pub const MAX_PRESIGN_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Hosting environment, controls error detail and HSTS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Redirect plain-HTTP requests (per `X-Forwarded-Proto`) to HTTPS
    #[serde(default)]
    pub https_redirect: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Overrides applied on top of the AWS default provider chain
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Region override; when unset the SDK resolves it (AWS_REGION, profile, IMDS)
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, LocalStack)
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
    /// Keys requested per ListObjectsV2 page
    #[serde(default = "default_page_size")]
    pub page_size: i32,
    #[serde(default = "default_presign_expiry_secs")]
    pub presign_expiry_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> i32 {
    100
}

fn default_presign_expiry_secs() -> u64 {
    900
}

fn default_title() -> String {
    "S3 Web Console".to_string()
}

fn default_static_dir() -> String {
    "public".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            https_redirect: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint_url: None,
            force_path_style: false,
            page_size: default_page_size(),
            presign_expiry_secs: default_presign_expiry_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            static_dir: default_static_dir(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values the server or the SDK would fail on later
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.port == 0 {
            return Err(config::ConfigError::Message(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if !(1..=1000).contains(&self.storage.page_size) {
            return Err(config::ConfigError::Message(format!(
                "storage.page_size must be between 1 and 1000, got {}",
                self.storage.page_size
            )));
        }

        if self.storage.presign_expiry_secs == 0
            || self.storage.presign_expiry_secs > MAX_PRESIGN_EXPIRY_SECS
        {
            return Err(config::ConfigError::Message(format!(
                "storage.presign_expiry_secs must be between 1 and {}, got {}",
                MAX_PRESIGN_EXPIRY_SECS, self.storage.presign_expiry_secs
            )));
        }

        if !self.observability.metrics.path.starts_with('/') {
            return Err(config::ConfigError::Message(format!(
                "observability.metrics.path must start with '/', got '{}'",
                self.observability.metrics.path
            )));
        }

        Ok(())
    }
}
