//! Error types for logger construction and configuration loading

use thiserror::Error;

/// Errors raised while turning a [`Config`](crate::Config) into a working logger
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An output target could not be opened
    #[error("failed to build logger: cannot open output `{target}`: {source}")]
    OpenSink {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// An output target string was empty
    #[error("failed to build logger: empty output target")]
    EmptyTarget,

    /// Level name not recognised
    #[error("unknown level: {0}")]
    UnknownLevel(String),

    /// Environment name not recognised
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    /// Encoding name not recognised
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Configuration document could not be parsed
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
