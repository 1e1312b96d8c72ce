//! Convenience view of a [`Logger`] with formatted and loosely typed
//! key/value logging.

use std::fmt;
use std::io;

use serde_json::Value;

use crate::field::Field;
use crate::level::Level;
use crate::logger::Logger;

/// Sugared logging handle.
///
/// `*f` methods take pre-built [`fmt::Arguments`] (use `format_args!`), `*w`
/// methods take a message plus key/value pairs.
#[derive(Debug, Clone)]
pub struct SugaredLogger {
    base: Logger,
}

fn pairs_to_fields<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> impl Iterator<Item = Field>
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs.into_iter().map(|(key, value)| Field::new(key, value))
}

impl SugaredLogger {
    pub fn new(base: Logger) -> Self {
        Self { base }
    }

    /// The structured handle underneath.
    pub fn desugar(&self) -> &Logger {
        &self.base
    }

    pub fn level(&self) -> Level {
        self.base.level()
    }

    /// Child with key/value pairs added to its context.
    pub fn with<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> SugaredLogger
    where
        K: Into<String>,
        V: Into<Value>,
    {
        SugaredLogger::new(self.base.with(pairs_to_fields(pairs)))
    }

    #[track_caller]
    pub fn logf(&self, level: Level, args: fmt::Arguments<'_>) {
        self.base.log_fmt(level, args);
    }

    #[track_caller]
    pub fn logw<K, V>(&self, level: Level, msg: &str, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.base.log(level, msg, pairs_to_fields(pairs));
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Debug, args);
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Info, args);
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Warn, args);
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Error, args);
    }

    /// Formatted Fatal entry; runs the fatal hook afterwards.
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Fatal, args);
    }

    #[track_caller]
    pub fn debugw<K, V>(&self, msg: &str, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.logw(Level::Debug, msg, pairs);
    }

    #[track_caller]
    pub fn infow<K, V>(&self, msg: &str, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.logw(Level::Info, msg, pairs);
    }

    #[track_caller]
    pub fn warnw<K, V>(&self, msg: &str, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.logw(Level::Warn, msg, pairs);
    }

    #[track_caller]
    pub fn errorw<K, V>(&self, msg: &str, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.logw(Level::Error, msg, pairs);
    }

    /// Fatal entry with key/value pairs; runs the fatal hook afterwards.
    #[track_caller]
    pub fn fatalw<K, V>(&self, msg: &str, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.logw(Level::Fatal, msg, pairs);
    }

    pub fn sync(&self) -> io::Result<()> {
        self.base.sync()
    }
}
