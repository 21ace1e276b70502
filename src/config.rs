//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads an optional `config.toml` and deserializes into strongly-typed
//! structs. Every section has defaults, so the server runs without a file.
//! Secrets (wallet key, funder address) are referenced by env-var name in
//! the config and resolved at startup via `std::env::var`.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Env file checked first; kept out of version control.
pub const LOCAL_ENV_FILE: &str = "env.local";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub clob: ClobConfig,
    pub logging: LoggingConfig,
}

/// Identity reported to the client during `initialize`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "polymarket_predictions".to_string(),
            version: "0.1.0".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClobConfig {
    pub host: String,
    /// Env var that overrides `host` when set and non-empty.
    pub host_env: String,
    /// Env var holding the wallet private key exported from the Polymarket UI.
    pub key_env: String,
    /// Env var holding the funder address from the Polymarket UI.
    pub funder_env: String,
    /// Polygon mainnet. Only reported at startup; reads are unsigned.
    pub chain_id: u64,
    pub signature_type: u8,
    pub timeout_secs: u64,
}

impl Default for ClobConfig {
    fn default() -> Self {
        Self {
            host: "https://clob.polymarket.com".to_string(),
            host_env: "CLOB_HOST".to_string(),
            key_env: "KEY".to_string(),
            funder_env: "FUNDER".to_string(),
            chain_id: 137,
            signature_type: 1,
            timeout_secs: 30,
        }
    }
}

impl ClobConfig {
    /// The API host, taking the env override into account.
    pub fn resolve_host(&self) -> String {
        non_empty_env(&self.host_env).unwrap_or_else(|| self.host.clone())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "polymarket_predictions=info".to_string(),
            json: false,
        }
    }
}

/// Wallet credentials for the CLOB API. Their presence gates upstream calls;
/// the key itself is never sent.
#[derive(Clone)]
pub struct ClobCredentials {
    pub key: SecretString,
    pub funder: String,
}

impl fmt::Debug for ClobCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClobCredentials")
            .field("key", &"[REDACTED]")
            .field("funder", &self.funder)
            .finish()
    }
}

impl ClobCredentials {
    /// Read credentials from the env vars named in `cfg`.
    /// Returns `None` if either is unset or empty.
    pub fn from_env(cfg: &ClobConfig) -> Option<Self> {
        let key = non_empty_env(&cfg.key_env)?;
        let funder = non_empty_env(&cfg.funder_env)?;
        Some(Self {
            key: SecretString::new(key),
            funder,
        })
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            debug!(path, "No config file found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Load `env.local` if present, else `.env`. Values override variables that
/// are already set: MCP hosts often pass credentials through as empty strings.
/// Returns the file that was loaded.
pub fn load_env_files() -> Option<PathBuf> {
    if Path::new(LOCAL_ENV_FILE).exists() {
        dotenvy::from_filename_override(LOCAL_ENV_FILE).ok()
    } else {
        dotenvy::dotenv_override().ok()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
