//! Configuration management for document search.
//!
//! This module handles loading and validating configuration from environment variables.
//! It avoids polluting stdout (which MCP uses for communication) by loading the
//! .env file through `dotenvy`, which never prints.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::path::PathBuf;

/// Smallest fragment length that still leaves room for context and ellipses.
const MIN_FRAGMENT_LENGTH: usize = 16;

/// Configuration for the document search host.
#[derive(Debug, Clone)]
pub struct Config {
    /// Characters of context shown on each side of a match (default: 40)
    pub context_chars: usize,

    /// Maximum fragment length in characters (default: 120)
    pub max_fragment_length: usize,

    /// Base directory for relative document paths (default: ".")
    pub document_root: PathBuf,

    /// Log level (default: "error")
    pub log_level: String,
}

/// Fragment sizing shared by the built-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Characters of context shown on each side of a match
    pub context_chars: usize,

    /// Maximum fragment length in characters, ellipses included
    pub max_fragment_length: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            context_chars: 40,
            max_fragment_length: 120,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `DOCSEARCH_CONTEXT_CHARS`: Fragment context per side (default: 40)
    /// - `DOCSEARCH_MAX_FRAGMENT_LENGTH`: Fragment cap (default: 120, minimum 16)
    /// - `DOCSEARCH_ROOT`: Base directory for documents (default: ".")
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let context_chars = Self::parse_env_usize("DOCSEARCH_CONTEXT_CHARS", 40)?;
        let max_fragment_length = Self::parse_env_usize("DOCSEARCH_MAX_FRAGMENT_LENGTH", 120)?;

        if max_fragment_length < MIN_FRAGMENT_LENGTH {
            return Err(ConfigError::InvalidValue {
                var: "DOCSEARCH_MAX_FRAGMENT_LENGTH".to_string(),
                reason: format!("Must be at least {}", MIN_FRAGMENT_LENGTH),
            });
        }

        let document_root = match env::var("DOCSEARCH_ROOT") {
            Ok(val) if val.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    var: "DOCSEARCH_ROOT".to_string(),
                    reason: "Cannot be empty".to_string(),
                });
            }
            Ok(val) => PathBuf::from(val),
            Err(_) => PathBuf::from("."),
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            context_chars,
            max_fragment_length,
            document_root,
            log_level,
        })
    }

    /// Fragment sizing for the built-in providers.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            context_chars: self.context_chars,
            max_fragment_length: self.max_fragment_length,
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let search = SearchConfig::default();
        Config {
            context_chars: search.context_chars,
            max_fragment_length: search.max_fragment_length,
            document_root: PathBuf::from("."),
            log_level: "error".to_string(),
        }
    }
}
