//! 应用配置
//!
//! 从环境变量读取（支持 .env），全部带默认值。

use campus_client::ClientConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Default bounded wait for a permission resolution
const DEFAULT_PERMISSION_TIMEOUT_MS: u64 = 10_000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base URL
    pub api_base_url: String,
    /// Local data directory (session store, logs)
    pub data_dir: PathBuf,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Bounded wait for the role→permission query; exceeding it fails closed
    pub permission_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_base_url = std::env::var("CAMPUS_API_URL")
            .unwrap_or_else(|_| "http://localhost:8081".to_string());

        let data_dir = std::env::var("CAMPUS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./ivy-hall-data"));

        let request_timeout_secs = std::env::var("CAMPUS_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let permission_timeout_ms = std::env::var("CAMPUS_PERMISSION_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PERMISSION_TIMEOUT_MS);

        Self {
            api_base_url,
            data_dir,
            request_timeout_secs,
            permission_timeout: Duration::from_millis(permission_timeout_ms),
        }
    }

    /// Configuration for the HTTP client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_base_url).with_timeout(self.request_timeout_secs)
    }

    /// Log directory under the data dir
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8081".to_string(),
            data_dir: PathBuf::from("./ivy-hall-data"),
            request_timeout_secs: 30,
            permission_timeout: Duration::from_millis(DEFAULT_PERMISSION_TIMEOUT_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.permission_timeout, Duration::from_secs(10));
        assert!(config.log_dir().ends_with("logs"));
    }
}
