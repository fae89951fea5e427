//! Runtime configuration read from the environment (and `.env`, if present).

use crate::errors::ConfigError;
use crate::reconcile::ReconcilePolicy;
use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3009;
const DEFAULT_BASE_PATH: &str = "/gym";
const DEFAULT_DATA_PATH: &str = "data/db.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Permissive CORS for a separately served client.
    Development,
    /// Serves the client bundle itself.
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Leading slash, no trailing slash, or empty for root.
    pub base_path: String,
    pub mode: Mode,
    pub data_path: PathBuf,
    pub store: StoreBackend,
    pub client_dist: Option<PathBuf>,
    pub reconcile_policy: ReconcilePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
            mode: Mode::Development,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            store: StoreBackend::File,
            client_dist: None,
            reconcile_policy: ReconcilePolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                message: format!("'{value}' is not a port number"),
            })?,
            None => DEFAULT_PORT,
        };

        let base_path = normalize_base_path(
            &lookup("BASE_PATH").unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
        );

        let mode = match lookup("APP_ENV").as_deref().map(str::trim) {
            Some("production") => Mode::Production,
            _ => Mode::Development,
        };

        let store = match lookup("LOG_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("file") => StoreBackend::File,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_STORE",
                    message: format!("expected 'file' or 'memory', got '{other}'"),
                });
            }
        };

        let reconcile_policy = match lookup("RECONCILE_POLICY") {
            Some(value) => value.parse().map_err(|message| ConfigError::Invalid {
                key: "RECONCILE_POLICY",
                message,
            })?,
            None => ReconcilePolicy::default(),
        };

        Ok(Self {
            port,
            base_path,
            mode,
            data_path: resolve_data_path(lookup("APP_DATA_PATH")),
            store,
            client_dist: lookup("CLIENT_DIST_DIR")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            reconcile_policy,
        })
    }

    /// Where the JSON API is mounted.
    pub fn api_base(&self) -> String {
        format!("{}/api", self.base_path)
    }
}

fn resolve_data_path(value: Option<String>) -> PathBuf {
    match value {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_DATA_PATH),
    }
}

pub fn normalize_base_path(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() || value == "/" {
        return String::new();
    }
    let with_slash = if value.starts_with('/') {
        value.to_string()
    } else {
        format!("/{value}")
    };
    with_slash
        .strip_suffix('/')
        .map(str::to_string)
        .unwrap_or(with_slash)
}
