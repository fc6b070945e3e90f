// ABOUTME: Sprout configuration library
// ABOUTME: Environment variable names and the client configuration loader

pub mod constants;
pub mod settings;

pub use settings::{ClientConfig, ConfigError, FileConfig};
