use std::env;
use std::fmt;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_APP_NAME: &str = "Arranchamento B Adm";

/// Minimum length of a usable `SESSION_KEY`.
pub const MIN_SESSION_KEY_LEN: usize = 64;

/// Where records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// JSON file in a local directory.
    Local { data_dir: PathBuf },
    /// PostgreSQL table with change notifications.
    Remote { database_url: String },
    /// Volatile table, lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub storage: StorageBackend,
    pub session_key: Option<String>,
    pub app_name: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBackend(String),
    MissingDatabaseUrl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownBackend(name) => {
                write!(f, "Unknown STORAGE_BACKEND {name:?} (expected local, remote or memory)")
            }
            ConfigError::MissingDatabaseUrl => {
                write!(f, "STORAGE_BACKEND=remote requires DATABASE_URL")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Read configuration from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL");
        let backend = get("STORAGE_BACKEND").map(|b| b.trim().to_ascii_lowercase());
        let storage = match (backend.as_deref(), database_url) {
            (None | Some("remote"), Some(database_url)) => StorageBackend::Remote { database_url },
            (Some("remote"), None) => return Err(ConfigError::MissingDatabaseUrl),
            (None | Some("local"), _) => StorageBackend::Local {
                data_dir: PathBuf::from(get("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
            },
            (Some("memory"), _) => StorageBackend::Memory,
            (Some(other), _) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            storage,
            session_key: get("SESSION_KEY"),
            app_name: get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            storage: StorageBackend::Memory,
            session_key: None,
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}
