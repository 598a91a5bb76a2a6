//! Configuration for the fleetwatch dashboard client.
//!
//! TOML config file merged with `FLEETWATCH_`-prefixed environment
//! variables, plus durable token storage (keyring with a file fallback).

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fleetwatch_core::{TlsMode, TransportConfig};

mod token_store;

pub use token_store::{DurableTokenStore, FileTokenStore, KeyringTokenStore, default_token_store};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Dashboard API server base URL (e.g. "https://fleet.example.com").
    pub server: Option<String>,

    /// Default login username, so `fleetwatch login` only prompts for the
    /// password.
    pub username: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Default number of reports to fetch per listing.
    #[serde(default = "default_report_limit")]
    pub report_limit: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            ca_cert: None,
            timeout: default_timeout(),
            report_limit: default_report_limit(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_report_limit() -> u32 {
    20
}

impl Config {
    /// Translate the TLS and timeout settings into a transport config.
    pub fn transport(&self) -> TransportConfig {
        let tls = if self.defaults.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.defaults.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };

        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.defaults.timeout),
        }
    }

    /// The configured server URL, if any source supplied one.
    pub fn server(&self) -> Result<&str, ConfigError> {
        self.server
            .as_deref()
            .ok_or_else(|| ConfigError::Validation {
                field: "server".into(),
                reason: "no server URL configured (set `server` in config.toml, \
                         FLEETWATCH_SERVER, or pass --server)"
                    .into(),
            })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "fleetwatch", "fleetwatch")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fleetwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// Precedence, lowest to highest: built-in defaults, `config.toml`,
/// `FLEETWATCH_*` environment variables.
pub fn load_config() -> Result<Config, ConfigError> {
    load_from(Toml::file(config_path()))
}

fn load_from(file: figment::providers::Data<figment::providers::Toml>) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(file)
        .merge(Env::prefixed("FLEETWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}
