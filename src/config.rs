//! Configuration loading
//!
//! Read from an optional TOML file; every field has a default so an empty
//! file (or no file) is a valid configuration.
//!
//! ```toml
//! [server]
//! addr = "0.0.0.0:8000"
//!
//! [reply]
//! command = "ollama"
//! model = "phi3:mini"
//! timeout_secs = 30
//! context_messages = 5
//!
//! [logging]
//! level = "info"
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::error::Result;
use crate::{REPLY_CONTEXT_MESSAGES, REPLY_TIMEOUT_SECS};

/// Main configuration struct
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub reply: ReplyConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP/WebSocket listener
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_addr")]
    pub addr: String,
}

/// Text-generation collaborator
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyConfig {
    /// Executable invoked as `<command> run <model> <prompt>`
    #[serde(default = "default_command")]
    pub command: String,

    /// Model name passed to the command
    #[serde(default = "default_model")]
    pub model: String,

    /// Time bound on one generation
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Conversation messages included in the prompt
    #[serde(default = "default_context_messages")]
    pub context_messages: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "companion_mind=debug"
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_command() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "phi3:mini".to_string()
}

fn default_timeout_secs() -> u64 {
    REPLY_TIMEOUT_SECS
}

fn default_context_messages() -> usize {
    REPLY_CONTEXT_MESSAGES
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            context_messages: default_context_messages(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level() }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
