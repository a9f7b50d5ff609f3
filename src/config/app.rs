//! Application configuration loading from config.toml
//!
//! The file holds the server bind address, the allocation checker's open-ended policy and
//! an optional list of employees to seed on start. Every section is optional; a missing
//! file falls back to the defaults. `CONFIG_PATH` selects the file and `BIND_ADDRESS`
//! overrides the configured address.

use crate::core::overlap::OpenEndedPolicy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Config file read when `CONFIG_PATH` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Address the HTTP server binds to when nothing else is configured.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub allocation: AllocationConfig,
    /// Employees inserted on start if they do not exist yet
    #[serde(default)]
    pub employees: Vec<EmployeeSeed>,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

/// Allocation checker settings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AllocationConfig {
    /// How opportunities without an end date are matched against the window
    #[serde(default)]
    pub open_ended_policy: OpenEndedPolicy,
}

/// Configuration for a single seeded employee
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EmployeeSeed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Loads configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type or an unknown policy name
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);

    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads the application configuration for the running service.
///
/// Reads the file named by `CONFIG_PATH` (default `config.toml`). A missing file is not an
/// error: defaults are used and a warning is logged. A present but malformed file is.
/// `BIND_ADDRESS`, when set, replaces the configured server address.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if Path::new(&path).exists() {
        let config = load_config(&path)?;
        info!("Loaded configuration from {path}");
        config
    } else {
        warn!("Config file {path} not found, using defaults");
        AppConfig::default()
    };

    if let Ok(bind_address) = std::env::var("BIND_ADDRESS") {
        config.server.bind_address = bind_address;
    }

    Ok(config)
}
