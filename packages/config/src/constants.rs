// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Sprout

// API Configuration
pub const SPROUT_API_URL: &str = "SPROUT_API_URL";
pub const SPROUT_HTTP_TIMEOUT_SECS: &str = "SPROUT_HTTP_TIMEOUT_SECS";

// Share links point at the public front-end, not the API
pub const SPROUT_PUBLIC_URL: &str = "SPROUT_PUBLIC_URL";

// Session Storage
pub const SPROUT_SESSION_FILE: &str = "SPROUT_SESSION_FILE";
pub const SPROUT_CONFIG_FILE: &str = "SPROUT_CONFIG_FILE";

// Logging
pub const SPROUT_LOG: &str = "SPROUT_LOG";

// Defaults
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Directory under the user's home holding session and config files
pub const SPROUT_DIR: &str = ".sprout";
pub const SESSION_FILE_NAME: &str = "session.toml";
pub const CONFIG_FILE_NAME: &str = "config.toml";
