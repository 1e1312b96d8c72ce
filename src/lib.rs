//! logfacade: a process-wide structured logging facade.
//!
//! ## Overview
//!
//! One logger handle serves the whole process. It starts out with the
//! development defaults the first time the facade is used and can be
//! reconfigured at any time from any thread:
//!
//! ```no_run
//! use logfacade::{fields, Environment, Level};
//!
//! logfacade::set_environment(Environment::Production)?;
//! logfacade::info("svc up", fields! { "port" => 8080 });
//! logfacade::warnf!("{} retries left", 2);
//!
//! logfacade::set_level(Level::Error);
//! logfacade::sync()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Defaults per environment
//!
//! | Environment | level | encoding | outputs |
//! |---|---|---|---|
//! | Development | debug | console | stdout |
//! | Test | error | json | none |
//! | Staging | info | json | stdout |
//! | Production | warn | json | stdout |
//!
//! ## Concurrency
//!
//! The active handle sits behind a single read/write lock. Logging calls and
//! accessors share it; [`initialize`], [`set_environment`], [`set_level`],
//! [`replace_handle`] and [`shutdown`] take it exclusively, and only for the
//! swap itself. A logging call always sees either the old or the new handle.
//!
//! ## Fatal
//!
//! [`fatal`], [`fatalf`] and [`fatalf!`] end the process after the entry is
//! flushed. The facade never calls them itself.

mod bridge;
mod facade;
mod macros;
mod state;

pub use bridge::{install_tracing_bridge, tracing_layer};
pub use facade::{
    current_environment, debug, debugf, error, errorf, fatal, fatalf, handle, info, infof,
    init_from_env, initialize, replace_handle, set_environment, set_level, shutdown,
    sugared_handle, sync, warn, warnf, with, with_fields,
};

// Re-exports
pub use logfacade_core::{
    default_config, fields, Config, ConfigError, Encoding, Environment, FatalHook, Field, Level,
    LogEntry, Logger, LoggerBuilder, MemorySink, Sampling, Sink, SugaredLogger,
};
