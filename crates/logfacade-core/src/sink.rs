//! Output destinations for encoded entries.
//!
//! Every write is a complete, newline-terminated entry. File sinks buffer
//! behind a mutex and are flushed on [`Sink::flush`] and on drop.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{ConfigError, ConfigResult};

/// A single output destination.
pub enum Sink {
    Stdout,
    Stderr,
    /// Append-only file
    File {
        path: PathBuf,
        writer: Mutex<BufWriter<File>>,
    },
    /// Shared in-memory buffer
    Memory(MemorySink),
}

impl Sink {
    /// Open a sink from an output target string.
    ///
    /// `"stdout"` and `"stderr"` name the standard streams; anything else is a
    /// file path, optionally written as a `file://` URL. Files are opened in
    /// append mode and created if missing; their directory must exist.
    pub fn open(target: &str) -> ConfigResult<Self> {
        match target_path(target)? {
            None if target == "stdout" => Ok(Sink::Stdout),
            None => Ok(Sink::Stderr),
            Some(path) => Self::file(path).map_err(|source| open_error(target, source)),
        }
    }

    /// Check a target without creating anything: it must be non-empty and a
    /// file target's directory must exist.
    pub fn check(target: &str) -> ConfigResult<()> {
        let Some(path) = target_path(target)? else {
            return Ok(());
        };
        if path.is_dir() {
            return Err(open_error(
                target,
                io::Error::new(io::ErrorKind::Other, "target is a directory"),
            ));
        }
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => Err(open_error(
                target,
                io::Error::new(io::ErrorKind::NotFound, "parent directory does not exist"),
            )),
            _ => Ok(()),
        }
    }

    /// Open an append-only file sink.
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Sink::File {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn memory(buffer: &MemorySink) -> Self {
        Sink::Memory(buffer.clone())
    }

    /// Short description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Sink::Stdout => "stdout".to_string(),
            Sink::Stderr => "stderr".to_string(),
            Sink::File { path, .. } => path.display().to_string(),
            Sink::Memory(_) => "memory".to_string(),
        }
    }

    /// Write one encoded entry.
    pub fn write(&self, line: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().lock().write_all(line),
            Sink::Stderr => io::stderr().lock().write_all(line),
            Sink::File { writer, .. } => writer.lock().write_all(line),
            Sink::Memory(buffer) => {
                buffer.append(line);
                Ok(())
            }
        }
    }

    /// Flush any buffered data.
    pub fn flush(&self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().lock().flush(),
            Sink::Stderr => io::stderr().lock().flush(),
            Sink::File { writer, .. } => writer.lock().flush(),
            Sink::Memory(_) => Ok(()),
        }
    }
}

/// File path named by a target, `None` for the standard streams.
fn target_path(target: &str) -> ConfigResult<Option<&Path>> {
    match target {
        "" => Err(ConfigError::EmptyTarget),
        "stdout" | "stderr" => Ok(None),
        other => {
            let path = other.strip_prefix("file://").unwrap_or(other);
            if path.is_empty() {
                return Err(ConfigError::EmptyTarget);
            }
            Ok(Some(Path::new(path)))
        }
    }
}

fn open_error(target: &str, source: io::Error) -> ConfigError {
    ConfigError::OpenSink {
        target: target.to_string(),
        source,
    }
}

impl Drop for Sink {
    fn drop(&mut self) {
        if let Sink::File { writer, .. } = self {
            let _ = writer.get_mut().flush();
        }
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Sink").field(&self.describe()).finish()
    }
}

/// The ordered set of sinks a logger writes to.
#[derive(Debug, Default)]
pub struct SinkSet {
    sinks: Vec<Sink>,
    /// Files that did not exist before this set opened them
    created: Vec<PathBuf>,
}

impl SinkSet {
    /// Check every target with [`Sink::check`].
    pub fn check<S: AsRef<str>>(targets: &[S]) -> ConfigResult<()> {
        targets.iter().try_for_each(|target| Sink::check(target.as_ref()))
    }

    /// Open every target, all or nothing.
    ///
    /// Targets are checked before any file is opened. If opening still fails
    /// part way, files this call created are removed again.
    pub fn open<S: AsRef<str>>(targets: &[S]) -> ConfigResult<Self> {
        Self::check(targets)?;

        let mut set = Self::default();
        for target in targets {
            let target = target.as_ref();
            let fresh = match target_path(target) {
                Ok(Some(path)) if !path.exists() => Some(path.to_path_buf()),
                _ => None,
            };
            match Sink::open(target) {
                Ok(sink) => {
                    set.sinks.push(sink);
                    set.created.extend(fresh);
                }
                Err(e) => {
                    set.discard();
                    return Err(e);
                }
            }
        }
        Ok(set)
    }

    /// Close every sink and remove the files this set created.
    pub fn discard(mut self) {
        self.sinks.clear();
        for path in self.created.drain(..) {
            let _ = fs::remove_file(path);
        }
    }

    /// Add a sink that the set does not own on disk; [`SinkSet::discard`]
    /// leaves its file in place.
    pub fn push(&mut self, sink: Sink) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Write to every sink, returning each failure with its sink.
    pub fn write_all(&self, line: &[u8]) -> Vec<(&Sink, io::Error)> {
        self.sinks
            .iter()
            .filter_map(|sink| sink.write(line).err().map(|e| (sink, e)))
            .collect()
    }

    /// Flush every sink. All sinks are attempted; the first error is returned.
    pub fn flush(&self) -> io::Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.flush() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Cloneable handle to an in-memory log buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&self, line: &[u8]) {
        self.buffer.lock().extend_from_slice(line);
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// Written entries, one per line.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}
