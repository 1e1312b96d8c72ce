//! logfacade core: the structured logging engine behind the facade.
//!
//! ## Overview
//!
//! A [`Logger`] is built from a [`Config`] and writes [`LogEntry`] records,
//! encoded as JSON lines or console text, to a set of [`Sink`]s. Handles are
//! cheap to clone; children created with [`Logger::with`] carry extra
//! context fields and share the parent's sinks.
//!
//! ```
//! use logfacade_core::{default_config, fields, Environment, Level, Logger, MemorySink, Sink};
//!
//! let buffer = MemorySink::new();
//! let config = default_config(Environment::Test).with_level(Level::Info);
//! let logger = Logger::builder(config).sink(Sink::memory(&buffer)).build()?;
//!
//! logger.info("svc up", fields! { "port" => 8080 });
//! assert!(buffer.contents().contains("\"port\":8080"));
//! # Ok::<(), logfacade_core::ConfigError>(())
//! ```
//!
//! `tracing` events can be routed into a logger with [`EngineLayer`].

pub mod config;
pub mod entry;
pub mod environment;
pub mod error;
pub mod field;
pub mod layer;
pub mod level;
pub mod logger;
mod sampler;
pub mod sink;
pub mod sugar;

// Re-exports
pub use config::{default_config, Config, Encoding, FatalHook, Sampling};
pub use entry::LogEntry;
pub use environment::Environment;
pub use error::{ConfigError, ConfigResult};
pub use field::Field;
pub use layer::EngineLayer;
pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use sink::{MemorySink, Sink, SinkSet};
pub use sugar::SugaredLogger;
