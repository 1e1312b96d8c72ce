//! Logger configuration and the per-environment defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::environment::Environment;
use crate::error::{ConfigError, ConfigResult};
use crate::level::Level;

/// Environment variable selecting the base environment.
pub const ENV_ENVIRONMENT: &str = "LOGFACADE_ENV";
/// Environment variable overriding the minimum level.
pub const ENV_LEVEL: &str = "LOGFACADE_LEVEL";
/// Environment variable overriding the encoding.
pub const ENV_ENCODING: &str = "LOGFACADE_ENCODING";
/// Environment variable overriding the output targets (comma separated).
pub const ENV_OUTPUT: &str = "LOGFACADE_OUTPUT";

/// How entries are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// One JSON object per line
    Json,
    /// Tab-separated, human-oriented text
    Console,
}

impl Encoding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::Console => "console",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "console" => Ok(Encoding::Console),
            _ => Err(ConfigError::UnknownEncoding(s.to_string())),
        }
    }
}

/// What a logger does after recording a [`Level::Fatal`] entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatalHook {
    /// Flush, then `std::process::exit(1)`.
    #[default]
    Exit,
    /// Flush, then panic with the entry message. Meant for tests that need to
    /// observe fatal logging without ending the test process.
    Panic,
}

/// Per-message rate limit applied within each one-second window.
///
/// For every distinct level and message, the first `initial` entries in a
/// window are written, then every `thereafter`-th one. A `thereafter` of zero
/// drops everything past `initial`. Fatal entries are never sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sampling {
    pub initial: u64,
    pub thereafter: u64,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            initial: 100,
            thereafter: 100,
        }
    }
}

/// Logger configuration.
///
/// Build one with [`default_config`] and adjust fields, or load it with
/// [`Config::from_env`] / [`Config::from_json_str`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub environment: Environment,
    pub level: Level,
    /// `"stdout"`, `"stderr"`, a file path or a `file://` URL. Empty means
    /// entries are dropped.
    pub output_paths: Vec<String>,
    pub encoding: Encoding,
    /// Where the logger reports its own write failures.
    pub error_output_paths: Vec<String>,
    /// Annotate entries with the calling source location.
    pub add_caller: bool,
    /// Record a stack trace on entries at or above this level.
    pub stacktrace_level: Option<Level>,
    /// `None` writes every entry.
    pub sampling: Option<Sampling>,
    pub fatal_hook: FatalHook,
    /// Context attached to every entry.
    pub initial_fields: Map<String, Value>,
}

/// Default configuration for an environment.
///
/// | Environment | level | encoding | outputs | stack traces | sampling |
/// |---|---|---|---|---|---|
/// | Development | debug | console | stdout | warn and above | off |
/// | Test | error | json | none | error and above | off |
/// | Staging | info | json | stdout | error and above | 100 / 100 |
/// | Production | warn | json | stdout | error and above | 100 / 100 |
pub fn default_config(env: Environment) -> Config {
    let (level, encoding, output_paths) = match env {
        Environment::Development => (Level::Debug, Encoding::Console, vec!["stdout".to_string()]),
        Environment::Test => (Level::Error, Encoding::Json, Vec::new()),
        Environment::Staging => (Level::Info, Encoding::Json, vec!["stdout".to_string()]),
        Environment::Production => (Level::Warn, Encoding::Json, vec!["stdout".to_string()]),
    };
    let stacktrace_level = match env {
        Environment::Development => Level::Warn,
        _ => Level::Error,
    };
    // Test keeps every entry so counts in assertions stay exact
    let sampling = match env {
        Environment::Staging | Environment::Production => Some(Sampling::default()),
        Environment::Development | Environment::Test => None,
    };

    Config {
        environment: env,
        level,
        output_paths,
        encoding,
        error_output_paths: vec!["stderr".to_string()],
        add_caller: true,
        stacktrace_level: Some(stacktrace_level),
        sampling,
        fatal_hook: FatalHook::Exit,
        initial_fields: Map::new(),
    }
}

/// Partially specified configuration document; missing fields come from the
/// environment's defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDocument {
    #[serde(default)]
    environment: Environment,
    level: Option<Level>,
    output_paths: Option<Vec<String>>,
    encoding: Option<Encoding>,
    error_output_paths: Option<Vec<String>>,
    add_caller: Option<bool>,
    // `null` disables, a missing key keeps the default
    #[serde(default, deserialize_with = "present")]
    stacktrace_level: Option<Option<Level>>,
    #[serde(default, deserialize_with = "present")]
    sampling: Option<Option<Sampling>>,
    fatal_hook: Option<FatalHook>,
    initial_fields: Option<Map<String, Value>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ConfigDocument {
    fn into_config(self) -> Config {
        let mut config = default_config(self.environment);
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(paths) = self.output_paths {
            config.output_paths = paths;
        }
        if let Some(encoding) = self.encoding {
            config.encoding = encoding;
        }
        if let Some(paths) = self.error_output_paths {
            config.error_output_paths = paths;
        }
        if let Some(add_caller) = self.add_caller {
            config.add_caller = add_caller;
        }
        if let Some(stacktrace_level) = self.stacktrace_level {
            config.stacktrace_level = stacktrace_level;
        }
        if let Some(sampling) = self.sampling {
            config.sampling = sampling;
        }
        if let Some(hook) = self.fatal_hook {
            config.fatal_hook = hook;
        }
        if let Some(fields) = self.initial_fields {
            config.initial_fields = fields;
        }
        config
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        ConfigDocument::deserialize(deserializer).map(ConfigDocument::into_config)
    }
}

impl Config {
    /// Configuration from the `LOGFACADE_*` process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Configuration from an arbitrary variable lookup.
    ///
    /// `LOGFACADE_ENV` picks the base defaults (development when unset);
    /// `LOGFACADE_LEVEL`, `LOGFACADE_ENCODING` and `LOGFACADE_OUTPUT` override
    /// individual fields. An empty `LOGFACADE_OUTPUT` disables output.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup(ENV_ENVIRONMENT) {
            Some(name) => name.parse()?,
            None => Environment::Development,
        };

        let mut config = default_config(environment);

        if let Some(level) = lookup(ENV_LEVEL) {
            config.level = level.parse()?;
        }
        if let Some(encoding) = lookup(ENV_ENCODING) {
            config.encoding = encoding.parse()?;
        }
        if let Some(outputs) = lookup(ENV_OUTPUT) {
            config.output_paths = outputs
                .split(',')
                .map(str::trim)
                .filter(|target| !target.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(config)
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_output_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_fatal_hook(mut self, hook: FatalHook) -> Self {
        self.fatal_hook = hook;
        self
    }

    pub fn with_stacktrace_level(mut self, level: Option<Level>) -> Self {
        self.stacktrace_level = level;
        self
    }

    pub fn with_sampling(mut self, sampling: Option<Sampling>) -> Self {
        self.sampling = sampling;
        self
    }
}
