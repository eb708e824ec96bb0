use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_PATH: &str = "docchat.toml";
const DEFAULT_API_BASE: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the answering service, without the `/api` prefix.
    pub api_base: String,
    pub http_proxy: String,
    pub https_proxy: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// Retries for transient failures on JSON endpoints. Uploads are never retried.
    pub max_retries: u32,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Optional local size cap. Unset, any size goes to the endpoint.
    pub max_file_bytes: Option<u64>,
    pub progress_interval_ms: u64,
    pub progress_step: u8,
    /// Simulated progress stops here until the transfer is confirmed.
    pub progress_ceiling: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: None,
            progress_interval_ms: 100,
            progress_step: 5,
            progress_ceiling: 95,
        }
    }
}

impl UploadConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            http_proxy: String::new(),
            https_proxy: String::new(),
            request_timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            max_retries: 0,
            upload: UploadConfig::default(),
        }
    }
}

fn docchat_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".docchat")
}

fn docchat_config_json_path() -> PathBuf {
    docchat_dir().join("config.json")
}

impl Config {
    /// Load configuration from `~/.docchat/config.json`, falling back to
    /// `./docchat.toml`, then apply environment overrides.
    ///
    /// A missing file is not an error; an unreadable or invalid one is
    /// logged and skipped.
    pub fn load() -> Self {
        let mut config = Config::default();

        let json_path = docchat_config_json_path();
        let toml_path = Path::new(CONFIG_FILE_PATH);
        for path in [json_path.as_path(), toml_path] {
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(file_config) => {
                    tracing::debug!("Loaded config from {}", path.display());
                    config = file_config;
                    break;
                }
                Err(e) => tracing::warn!("Ignoring config file: {}", e),
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Parse a config file, choosing the format from its extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(api_base) = var("DOCCHAT_API_BASE") {
            self.api_base = api_base;
        }
        if let Some(http_proxy) = var("HTTP_PROXY") {
            self.http_proxy = http_proxy;
        }
        if let Some(https_proxy) = var("HTTPS_PROXY") {
            self.https_proxy = https_proxy;
        }
        if let Some(timeout) = var("DOCCHAT_TIMEOUT_SECS") {
            match timeout.trim().parse::<u64>() {
                Ok(0) => self.request_timeout_secs = None,
                Ok(secs) => self.request_timeout_secs = Some(secs),
                Err(_) => tracing::warn!("Ignoring invalid DOCCHAT_TIMEOUT_SECS={timeout:?}"),
            }
        }
        if let Some(retries) = var("DOCCHAT_MAX_RETRIES") {
            match retries.trim().parse::<u32>() {
                Ok(n) => self.max_retries = n,
                Err(_) => tracing::warn!("Ignoring invalid DOCCHAT_MAX_RETRIES={retries:?}"),
            }
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Join an endpoint path onto the API base, tolerating a trailing slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
