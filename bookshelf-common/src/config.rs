//! Configuration loading and config file resolution
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. OS-dependent default under the user config directory
//!
//! A missing config file is not an error: a warning is logged and compiled
//! defaults are used. A config file that exists but cannot be parsed is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Error, Result};

/// Default Open Library API base URL
pub const DEFAULT_OPEN_LIBRARY_URL: &str = "https://openlibrary.org";

/// Default Open Library cover image base URL
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";

/// Default Google Books API base URL
pub const DEFAULT_GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1";

/// Default bind address for the lookup service
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default port for the lookup service
pub const DEFAULT_PORT: u16 = 5780;

/// Service configuration read from TOML
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Bind address override
    #[serde(default)]
    pub bind: Option<String>,
    /// Port override
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// `[logging]` table
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset (e.g. "info", "bookshelf_lookup=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[providers]` table: where and how to reach the metadata providers
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub open_library_url: String,
    pub covers_url: String,
    pub google_books_url: String,
    /// User-Agent sent with every outbound request
    pub user_agent: String,
    /// Per-request timeout; unset means the HTTP client's default
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            open_library_url: DEFAULT_OPEN_LIBRARY_URL.to_string(),
            covers_url: DEFAULT_COVERS_URL.to_string(),
            google_books_url: DEFAULT_GOOGLE_BOOKS_URL.to_string(),
            user_agent: format!("bookshelf/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: None,
        }
    }
}

impl ProvidersConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl TomlConfig {
    /// Parse a config file. Fails if it is unreadable or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the config file if present, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => {
                let config = Self::load(path)?;
                info!(path = %path.display(), "Loaded configuration");
                Ok(config)
            }
            Some(path) => {
                warn!(
                    path = %path.display(),
                    "Config file not found, using compiled defaults"
                );
                Ok(Self::default())
            }
            None => {
                warn!("No config directory available, using compiled defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn bind_or_default(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

/// Resolve which config file to read.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: OS-dependent default
    default_config_path()
}

/// `<config dir>/bookshelf/bookshelf-lookup.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bookshelf").join("bookshelf-lookup.toml"))
}
