//! The engine handle: leveled, structured logging into a set of sinks.

use std::backtrace::Backtrace;
use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::{Config, Encoding, FatalHook};
use crate::entry::LogEntry;
use crate::error::ConfigResult;
use crate::field::{extend_map, Field};
use crate::level::Level;
use crate::sampler::Sampler;
use crate::sink::{Sink, SinkSet};
use crate::sugar::SugaredLogger;

/// State shared by a logger and every handle derived from it.
#[derive(Debug)]
struct Core {
    encoding: Encoding,
    sinks: SinkSet,
    error_sinks: SinkSet,
    add_caller: bool,
    stacktrace_level: Option<Level>,
    sampler: Option<Sampler>,
    fatal_hook: FatalHook,
}

impl Core {
    fn admit(&self, level: Level, msg: &str) -> bool {
        self.sampler
            .as_ref()
            .map_or(true, |sampler| sampler.admit(level, msg))
    }

    /// Attach a stack trace when the level asks for one and something will
    /// read it.
    fn annotate(&self, mut entry: LogEntry) -> LogEntry {
        let wanted = self.stacktrace_level.is_some_and(|min| entry.level >= min);
        if wanted && !self.sinks.is_empty() {
            entry = entry.with_stacktrace(Backtrace::force_capture().to_string());
        }
        entry
    }

    fn write(&self, entry: &LogEntry) {
        let line = match entry.encode(self.encoding) {
            Ok(line) => line,
            Err(e) => {
                self.report(format_args!("failed to encode entry {:?}: {}", entry.msg, e));
                return;
            }
        };

        for (sink, e) in self.sinks.write_all(&line) {
            self.report(format_args!("write to {} failed: {}", sink.describe(), e));
        }
    }

    // Write failures are the engine's own concern; they go to the error
    // sinks and never back to the caller.
    fn report(&self, args: fmt::Arguments<'_>) {
        let ts = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let mut line: Vec<u8> = Vec::new();
        let _ = writeln!(line, "{} logger error: {}", ts, args);
        let _ = self.error_sinks.write_all(&line);
    }
}

/// A handle to a built logging engine.
///
/// Cloning is cheap: clones and children created with [`Logger::with`] share
/// the same sinks. Each handle carries its own minimum level and context
/// fields.
#[derive(Debug, Clone)]
pub struct Logger {
    core: Arc<Core>,
    min_level: Level,
    context: Arc<Map<String, Value>>,
}

impl Logger {
    /// Build a logger from a configuration.
    ///
    /// Fails with [`ConfigError::OpenSink`](crate::ConfigError::OpenSink) if
    /// any output target cannot be opened. Building is all or nothing: every
    /// target is checked before any file is opened, and files created by a
    /// build that still fails are removed.
    pub fn build(config: &Config) -> ConfigResult<Self> {
        LoggerBuilder::new(config.clone()).build()
    }

    pub fn builder(config: Config) -> LoggerBuilder {
        LoggerBuilder::new(config)
    }

    /// Minimum level this handle records.
    pub fn level(&self) -> Level {
        self.min_level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    pub fn encoding(&self) -> Encoding {
        self.core.encoding
    }

    /// Context fields attached to every entry from this handle.
    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Record one entry.
    ///
    /// At [`Level::Fatal`] the entry is written, all sinks are flushed and the
    /// configured [`FatalHook`] runs; with the default hook this call does
    /// not return.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: impl IntoIterator<Item = Field>) {
        if !self.enabled(level) || !self.core.admit(level, msg) {
            return;
        }
        let mut merged = (*self.context).clone();
        extend_map(&mut merged, fields);
        self.emit(level, msg.to_string(), merged, Location::caller());
    }

    /// Record one entry with a formatted message.
    #[track_caller]
    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let msg = match args.as_str() {
            Some(s) => s.to_string(),
            None => args.to_string(),
        };
        if !self.core.admit(level, &msg) {
            return;
        }
        self.emit(level, msg, (*self.context).clone(), Location::caller());
    }

    /// Record an entry whose fields and caller were collected elsewhere
    /// (the tracing bridge).
    pub(crate) fn log_collected(
        &self,
        level: Level,
        msg: String,
        fields: Map<String, Value>,
        caller: Option<String>,
    ) {
        if !self.enabled(level) || !self.core.admit(level, &msg) {
            return;
        }
        let mut merged = (*self.context).clone();
        merged.extend(fields);
        let mut entry = LogEntry::new(level, msg).with_fields(merged);
        if self.core.add_caller {
            entry.caller = caller;
        }
        let entry = self.core.annotate(entry);
        self.core.write(&entry);
    }

    fn emit(&self, level: Level, msg: String, fields: Map<String, Value>, caller: &Location<'_>) {
        let mut entry = LogEntry::new(level, msg).with_fields(fields);
        if self.core.add_caller {
            entry = entry.with_caller(format!("{}:{}", caller.file(), caller.line()));
        }
        let entry = self.core.annotate(entry);
        self.core.write(&entry);

        if level == Level::Fatal {
            self.terminate(&entry.msg);
        }
    }

    fn terminate(&self, msg: &str) {
        let _ = self.sync();
        match self.core.fatal_hook {
            FatalHook::Exit => std::process::exit(1),
            FatalHook::Panic => panic!("fatal: {}", msg),
        }
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Debug, msg, fields);
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Info, msg, fields);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Warn, msg, fields);
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Error, msg, fields);
    }

    /// Record a Fatal entry, then run the fatal hook. Ends the process with
    /// the default [`FatalHook::Exit`].
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Fatal, msg, fields);
    }

    /// Child handle with `fields` merged into its context. The parent is
    /// unchanged.
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut context = (*self.context).clone();
        extend_map(&mut context, fields);
        Logger {
            core: Arc::clone(&self.core),
            min_level: self.min_level,
            context: Arc::new(context),
        }
    }

    /// Handle whose minimum level is at least `level`. Never lowers the
    /// current minimum; context is kept.
    pub fn with_min_level(&self, level: Level) -> Logger {
        Logger {
            core: Arc::clone(&self.core),
            min_level: self.min_level.max(level),
            context: Arc::clone(&self.context),
        }
    }

    /// Write a diagnostic line to the error outputs, not to the log.
    pub fn report(&self, args: fmt::Arguments<'_>) {
        self.core.report(args);
    }

    /// Flush every output sink.
    pub fn sync(&self) -> io::Result<()> {
        self.core.sinks.flush()
    }

    /// Sugared view of this handle.
    pub fn sugar(&self) -> SugaredLogger {
        SugaredLogger::new(self.clone())
    }
}

/// Builder for a [`Logger`], allowing sinks beyond the configured targets.
pub struct LoggerBuilder {
    config: Config,
    extra_sinks: Vec<Sink>,
    extra_error_sinks: Vec<Sink>,
}

impl LoggerBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            extra_sinks: Vec::new(),
            extra_error_sinks: Vec::new(),
        }
    }

    /// Add a sink after the configured output targets.
    pub fn sink(mut self, sink: Sink) -> Self {
        self.extra_sinks.push(sink);
        self
    }

    /// Add a sink after the configured error output targets.
    pub fn error_sink(mut self, sink: Sink) -> Self {
        self.extra_error_sinks.push(sink);
        self
    }

    pub fn build(self) -> ConfigResult<Logger> {
        SinkSet::check(&self.config.output_paths)?;
        SinkSet::check(&self.config.error_output_paths)?;

        let mut sinks = SinkSet::open(&self.config.output_paths)?;
        let mut error_sinks = match SinkSet::open(&self.config.error_output_paths) {
            Ok(error_sinks) => error_sinks,
            Err(e) => {
                sinks.discard();
                return Err(e);
            }
        };
        for sink in self.extra_sinks {
            sinks.push(sink);
        }
        for sink in self.extra_error_sinks {
            error_sinks.push(sink);
        }

        Ok(Logger {
            core: Arc::new(Core {
                encoding: self.config.encoding,
                sinks,
                error_sinks,
                add_caller: self.config.add_caller,
                stacktrace_level: self.config.stacktrace_level,
                sampler: self.config.sampling.map(Sampler::new),
                fatal_hook: self.config.fatal_hook,
            }),
            min_level: self.config.level,
            context: Arc::new(self.config.initial_fields),
        })
    }
}
