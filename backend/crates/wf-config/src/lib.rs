mod auth_config;
mod config;
mod cors_config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod server_config;

pub use auth_config::AuthConfig;
pub use config::Config;
pub use cors_config::CorsConfig;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use server_config::ServerConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const MIN_PORT: u16 = 1024;
const DEFAULT_DATABASE_FILENAME: &str = "wayfarer.db";
const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 900; // 15 minutes
const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 864_000; // 10 days
const MIN_SECRET_LEN: usize = 32;
const DEFAULT_COOKIE_SECURE: bool = true;
const DEFAULT_ALLOWED_ORIGIN: &str = "*";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

#[cfg(test)]
mod tests;
