//! Server configuration
//!
//! Defaults are compiled in. A YAML file named by `DOCSERVE_CONFIG` is layered
//! on top, and the first positional command-line argument overrides the port.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_ENV: &str = "DOCSERVE_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub log: LogConfig,
}

/// Listening socket and per-connection buffer settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, all interfaces by default
    pub bind_addr: String,
    pub port: u16,
    /// Pending connection queue length passed to listen()
    pub backlog: u32,
    /// Size of the single initial read holding the request line
    pub request_buffer_size: usize,
    /// Size of each chunk copied from a file to the client
    pub chunk_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            backlog: 128,
            request_buffer_size: 8192,
            chunk_size: 8192,
        }
    }
}

/// Document root settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory all files are served from
    pub root: PathBuf,
    /// File served for `/` and for targets ending in `/`
    pub index_file: String,
    /// Reject resolved paths whose canonical form leaves the root
    pub confine_symlinks: bool,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("www"),
            index_file: "index.html".to_string(),
            confine_symlinks: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Builds the effective configuration from the environment and the
    /// process arguments (program name already skipped).
    pub fn load<I>(mut args: I) -> Result<Self>
    where
        I: Iterator<Item = String>,
    {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Some(arg) = args.next() {
            cfg.apply_port_arg(&arg);
        }

        Ok(cfg)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::from_yaml(&text).with_context(|| format!("Invalid config file {}", path))
    }

    /// Parses YAML text; missing sections and fields keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("Failed to parse YAML configuration")
    }

    /// Applies the positional port argument. Anything that is not a
    /// non-zero port number is ignored.
    pub fn apply_port_arg(&mut self, arg: &str) {
        match arg.trim().parse::<u16>() {
            Ok(port) if port != 0 => self.server.port = port,
            _ => {
                tracing::warn!(arg = %arg, port = self.server.port, "Ignoring invalid port argument");
            }
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }

    /// Maximum log level, falling back to INFO on unknown names.
    pub fn log_level(&self) -> tracing::Level {
        self.log.level.parse().unwrap_or(tracing::Level::INFO)
    }
}
