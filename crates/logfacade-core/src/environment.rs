//! Deployment environments used as keys for default configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Deployment environment a logger is configured for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Environment {
    /// Debug logging with human-readable output
    #[default]
    Development = 0,
    /// Errors only, no output destinations
    Test = 1,
    /// Production-like settings with info logging
    Staging = 2,
    /// Warnings and above, structured output
    Production = 3,
}

impl Environment {
    /// All environments, in discriminant order.
    pub const ALL: [Environment; 4] = [
        Environment::Development,
        Environment::Test,
        Environment::Staging,
        Environment::Production,
    ];

    /// Lowercase name of the environment.
    pub const fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Environment for a raw discriminant, if it names one.
    pub const fn from_repr(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Environment::Development),
            1 => Some(Environment::Test),
            2 => Some(Environment::Staging),
            3 => Some(Environment::Production),
            _ => None,
        }
    }

    /// Name for a raw discriminant; `"unknown"` when out of range.
    pub const fn name_of(raw: u8) -> &'static str {
        match Self::from_repr(raw) {
            Some(env) => env.as_str(),
            None => "unknown",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}
