//! Configuration and leveled logging through the process-wide handle.

use std::fmt;
use std::io;

use logfacade_core::{
    default_config, Config, ConfigResult, Environment, Field, Level, Logger, SugaredLogger,
};

use crate::state;

/// Build a logger from `config` and make it the active handle.
///
/// The logger is built before the lock is taken; if building fails the error
/// is returned and the previously active handle stays in place. The replaced
/// handle is flushed after the swap.
pub fn initialize(config: Config) -> ConfigResult<()> {
    let logger = Logger::build(&config)?;
    let previous = state::write().install(logger, config.environment);

    if let Some(previous) = previous {
        let _ = previous.sync();
    }
    tracing::debug!(
        target: "logfacade::facade",
        environment = %config.environment,
        level = %config.level,
        encoding = %config.encoding,
        "logger initialized"
    );
    Ok(())
}

/// Re-initialize with the defaults for `env`.
pub fn set_environment(env: Environment) -> ConfigResult<()> {
    initialize(default_config(env))
}

/// Initialize from the `LOGFACADE_*` environment variables.
pub fn init_from_env() -> ConfigResult<()> {
    initialize(Config::from_env()?)
}

/// Raise the minimum level of the active handle in place.
///
/// Context fields are kept. A request below the current level is refused
/// and reported to the handle's error outputs. No-op when no handle is
/// active.
pub fn set_level(level: Level) {
    let mut guard = state::write();
    let environment = guard.environment;
    let Some(current) = guard.logger.clone() else {
        return;
    };

    if level < current.level() {
        drop(guard);
        current.report(format_args!(
            "cannot lower level from {} to {}; level stays {}",
            current.level(),
            level,
            current.level()
        ));
        tracing::debug!(target: "logfacade::facade", requested = %level, current = %current.level(), "level decrease refused");
        return;
    }

    guard.install(current.with_min_level(level), environment);
    drop(guard);

    tracing::debug!(target: "logfacade::facade", level = %level, "level raised");
}

/// Snapshot of the active handle.
///
/// The returned handle is not updated by later reconfiguration.
pub fn handle() -> Option<Logger> {
    state::read().logger.clone()
}

/// Snapshot of the active sugared handle.
pub fn sugared_handle() -> Option<SugaredLogger> {
    state::read().sugar.clone()
}

/// Environment of the most recently applied configuration.
pub fn current_environment() -> Environment {
    state::read().environment
}

/// Install a pre-built handle, keeping the current environment. Returns the
/// handle it replaces.
///
/// Useful to redirect the facade into a [`MemorySink`](logfacade_core::MemorySink)
/// or any other custom sink.
pub fn replace_handle(logger: Logger) -> Option<Logger> {
    let mut guard = state::write();
    let environment = guard.environment;
    guard.install(logger, environment)
}

/// Flush buffered output of the active handle. `Ok(())` when none is active.
pub fn sync() -> io::Result<()> {
    match state::read().logger.as_ref() {
        Some(logger) => logger.sync(),
        None => Ok(()),
    }
}

/// Remove the active handle and flush it. Leveled logging becomes a no-op
/// until the next [`initialize`].
pub fn shutdown() -> io::Result<()> {
    let previous = state::write().clear();
    tracing::debug!(target: "logfacade::facade", "logger shut down");
    match previous {
        Some(logger) => logger.sync(),
        None => Ok(()),
    }
}

/// Child handle with `fields` as default context, or `None` when no handle
/// is active. The facade's own handle is not modified.
pub fn with(fields: impl IntoIterator<Item = Field>) -> Option<Logger> {
    state::read().logger.as_ref().map(|logger| logger.with(fields))
}

/// Alias for [`with`].
pub fn with_fields(fields: impl IntoIterator<Item = Field>) -> Option<Logger> {
    with(fields)
}

#[track_caller]
fn log(level: Level, msg: &str, fields: impl IntoIterator<Item = Field>) {
    if let Some(logger) = state::read().logger.as_ref() {
        logger.log(level, msg, fields);
    }
}

#[track_caller]
fn logf(level: Level, args: fmt::Arguments<'_>) {
    if let Some(sugar) = state::read().sugar.as_ref() {
        sugar.logf(level, args);
    }
}

#[track_caller]
pub fn debug(msg: &str, fields: impl IntoIterator<Item = Field>) {
    log(Level::Debug, msg, fields);
}

#[track_caller]
pub fn info(msg: &str, fields: impl IntoIterator<Item = Field>) {
    log(Level::Info, msg, fields);
}

#[track_caller]
pub fn warn(msg: &str, fields: impl IntoIterator<Item = Field>) {
    log(Level::Warn, msg, fields);
}

#[track_caller]
pub fn error(msg: &str, fields: impl IntoIterator<Item = Field>) {
    log(Level::Error, msg, fields);
}

/// Log at Fatal level, then end the process.
///
/// The entry is written and every sink flushed before the handle's
/// [`FatalHook`](logfacade_core::FatalHook) runs; with the default
/// `FatalHook::Exit` the process exits with status 1 and this function does
/// not return. Use [`error`] for failures the program can survive. No-op when
/// no handle is active.
#[track_caller]
pub fn fatal(msg: &str, fields: impl IntoIterator<Item = Field>) {
    log(Level::Fatal, msg, fields);
}

/// Formatted debug entry; see the [`debugf!`](crate::debugf) macro.
#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) {
    logf(Level::Debug, args);
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    logf(Level::Info, args);
}

#[track_caller]
pub fn warnf(args: fmt::Arguments<'_>) {
    logf(Level::Warn, args);
}

#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) {
    logf(Level::Error, args);
}

/// Formatted Fatal entry; ends the process like [`fatal`].
#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) {
    logf(Level::Fatal, args);
}
