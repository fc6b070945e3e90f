// ABOUTME: Client configuration loaded from an optional TOML file and environment variables
// ABOUTME: Environment values override file values, which override built-in defaults

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::constants::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL for {name}: {value}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("URL for {0} must use http or https")]
    UnsupportedScheme(&'static str),
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
    #[error("Could not determine home directory")]
    NoHomeDirectory,
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("Invalid config file format: {0}")]
    Format(String),
}

/// Values that may appear in `~/.sprout/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub public_url: Option<String>,
    pub session_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::Format(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the plant-care REST API
    pub api_url: Url,
    /// Public front-end URL that share links are built from
    pub public_url: Url,
    pub session_file: PathBuf,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration: env > config file > defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let config_path = match env::var(SPROUT_CONFIG_FILE) {
            Ok(path) => PathBuf::from(path),
            Err(_) => sprout_dir()?.join(CONFIG_FILE_NAME),
        };
        let file = FileConfig::load(&config_path)?.unwrap_or_default();
        debug!("Loaded config file from {}", config_path.display());
        Self::resolve(file)
    }

    /// Apply environment overrides on top of file values
    pub fn resolve(file: FileConfig) -> Result<Self, ConfigError> {
        let api_url = env::var(SPROUT_API_URL)
            .ok()
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let public_url = env::var(SPROUT_PUBLIC_URL)
            .ok()
            .or(file.public_url)
            .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string());

        let session_file = match env::var(SPROUT_SESSION_FILE).ok().map(PathBuf::from) {
            Some(path) => path,
            None => match file.session_file {
                Some(path) => path,
                None => default_session_file()?,
            },
        };

        let timeout_secs = match env::var(SPROUT_HTTP_TIMEOUT_SECS) {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            Err(_) => file.timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }

        Ok(Self {
            api_url: parse_http_url(SPROUT_API_URL, &api_url)?,
            public_url: parse_http_url(SPROUT_PUBLIC_URL, &public_url)?,
            session_file,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_http_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|_| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(name)),
    }
}

/// `~/.sprout`
pub fn sprout_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(SPROUT_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

pub fn default_session_file() -> Result<PathBuf, ConfigError> {
    Ok(sprout_dir()?.join(SESSION_FILE_NAME))
}
