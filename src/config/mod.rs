//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables (`LOCALGRID_*`)
//!
//! Precedence, lowest first: defaults, the user config file, environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{LocalGridError, Result};

/// Env var overriding [`Config::data_dir`]
pub const ENV_DATA_DIR: &str = "LOCALGRID_DATA_DIR";
/// Env var overriding [`Config::tokenizers_dir`]
pub const ENV_TOKENIZERS_DIR: &str = "LOCALGRID_TOKENIZERS_DIR";
/// Env var overriding [`Config::default_encoding`]
pub const ENV_DEFAULT_ENCODING: &str = "LOCALGRID_DEFAULT_ENCODING";

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for `*_data.json` provider files, layered over the
    /// embedded provider data
    pub data_dir: PathBuf,

    /// Root of the per-family tokenizer directories
    pub tokenizers_dir: PathBuf,

    /// Generic tiktoken encoding used when no family tokenizer applies
    pub default_encoding: DefaultEncoding,
}

impl Default for Config {
    fn default() -> Self {
        let root = Self::user_data_root();
        Self {
            data_dir: root.join("data"),
            tokenizers_dir: root.join("tokenizers"),
            default_encoding: DefaultEncoding::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| LocalGridError::Config(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| LocalGridError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Apply environment variable overrides
    pub fn with_env(mut self) -> Self {
        if let Some(dir) = std::env::var_os(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = std::env::var_os(ENV_TOKENIZERS_DIR) {
            self.tokenizers_dir = PathBuf::from(dir);
        }
        if let Ok(name) = std::env::var(ENV_DEFAULT_ENCODING) {
            match DefaultEncoding::from_name(&name) {
                Some(encoding) => self.default_encoding = encoding,
                None => tracing::warn!(
                    "Ignoring unknown {}={}, keeping {}",
                    ENV_DEFAULT_ENCODING,
                    name,
                    self.default_encoding.name()
                ),
            }
        }
        self
    }

    /// Per-user asset root (`<data_dir>/localgrid`), or `localgrid` under
    /// the working directory when the platform has no data directory
    pub fn user_data_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("localgrid")
    }

    /// Location of the user config file (`<config_dir>/localgrid/config.toml`)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("localgrid").join("config.toml"))
    }

    /// Resolve the effective configuration: defaults, then the user config
    /// file if present, then environment overrides.
    ///
    /// Never fails; a broken config file is logged and skipped.
    pub fn load() -> Self {
        let base = match Self::user_config_path() {
            Some(path) if path.is_file() => match Self::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("{} ignored: {e}", path.display());
                    Self::default()
                }
            },
            _ => Self::default(),
        };

        base.with_env()
    }
}

/// Generic default tokenizer engine (fallback tier 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DefaultEncoding {
    /// OpenAI cl100k_base (GPT-3.5, GPT-4)
    #[default]
    Cl100kBase,
    /// OpenAI o200k_base (GPT-4o, o1, o3)
    O200kBase,
}

impl DefaultEncoding {
    /// Get encoding name as string
    pub fn name(&self) -> &'static str {
        match self {
            DefaultEncoding::Cl100kBase => "cl100k_base",
            DefaultEncoding::O200kBase => "o200k_base",
        }
    }

    /// Parse an encoding from its name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cl100k_base" | "cl100k" => Some(DefaultEncoding::Cl100kBase),
            "o200k_base" | "o200k" => Some(DefaultEncoding::O200kBase),
            _ => None,
        }
    }
}
