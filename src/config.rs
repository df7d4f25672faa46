//! Parser configuration.
//!
//! Configuration can come from a YAML file and is then overridden by
//! command-line flags. Every field has a default, so an empty file is valid:
//!
//! ```yaml
//! function_types: production
//! max_depth: 512
//! ```

use std::path::Path;
use std::{fmt, fs};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How `(-> A B)` and `(→ A B)` are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FunctionTypeMode {
    /// The arrow is an ordinary identifier heading an application.
    #[default]
    Application,
    /// The arrow is a head keyword producing a `function_type` node with
    /// `domain` and `codomain` fields.
    Production,
}

impl fmt::Display for FunctionTypeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionTypeMode::Application => f.write_str("application"),
            FunctionTypeMode::Production => f.write_str("production"),
        }
    }
}

pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    pub function_types: FunctionTypeMode,
    /// Maximum number of nested parenthesized forms. A lambda argument list
    /// counts as a level of its own, so `(λ (x) x)` needs a depth of 2.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            function_types: FunctionTypeMode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Couldn't read configuration file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration in {path}")]
    Invalid {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("max_depth must be at least 1")]
    ZeroDepth,
}

impl ParserConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        // serde_yaml reads an empty document as unit, not as an empty map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config = Self::from_yaml_str(&text).map_err(|source| ConfigError::Invalid {
            path: display,
            source,
        })?;
        config.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(self)
    }

    pub fn with_function_types(mut self, mode: FunctionTypeMode) -> Self {
        self.function_types = mode;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
