//! Rolling Logger
//!
//! Daily rolling log files plus an in-memory ring buffer of the most
//! recent lines. `init_logger` installs a `tracing` subscriber that also
//! captures records emitted through the `log` facade.

use chrono::NaiveDate;
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Log files kept on disk before the oldest is pruned
pub const DEFAULT_MAX_FILES: usize = 7;

/// Lines kept in the in-memory ring buffer
pub const DEFAULT_RING_CAPACITY: usize = 500;

static LOGGER: OnceLock<RollingWriter> = OnceLock::new();

/// Logger errors
#[derive(Debug)]
pub enum LoggerError {
    Io(io::Error),
    Init(String),
    AlreadyInitialized,
    NotInitialized,
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "Log I/O error: {}", e),
            LoggerError::Init(msg) => write!(f, "Failed to install logger: {}", msg),
            LoggerError::AlreadyInitialized => write!(f, "Logger already initialized"),
            LoggerError::NotInitialized => write!(f, "Logger not initialized"),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

/// One log file per day, `{prefix}.{YYYY-MM-DD}.log`
struct RollingFile {
    dir: PathBuf,
    prefix: String,
    max_files: usize,
    current_date: Option<NaiveDate>,
    file: Option<File>,
}

impl RollingFile {
    fn new(dir: PathBuf, prefix: &str, max_files: usize) -> Self {
        Self {
            dir,
            prefix: prefix.to_string(),
            max_files: max_files.max(1),
            current_date: None,
            file: None,
        }
    }

    fn file_name(&self, date: NaiveDate) -> String {
        format!("{}.{}.log", self.prefix, date.format("%Y-%m-%d"))
    }

    fn write_at(&mut self, date: NaiveDate, buf: &[u8]) -> io::Result<()> {
        if self.current_date != Some(date) || self.file.is_none() {
            let path = self.dir.join(self.file_name(date));
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            self.file = Some(file);
            self.current_date = Some(date);
            self.prune()?;
        }
        match self.file.as_mut() {
            Some(file) => file.write_all(buf),
            None => Ok(()),
        }
    }

    /// Remove the oldest files beyond `max_files`
    fn prune(&self) -> io::Result<()> {
        let head = format!("{}.", self.prefix);
        let mut logs: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(&head) && n.ends_with(".log"))
                    .unwrap_or(false)
            })
            .collect();

        // Dated names sort chronologically
        logs.sort();
        let excess = logs.len().saturating_sub(self.max_files);
        for path in logs.into_iter().take(excess) {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

struct Inner {
    file: Mutex<RollingFile>,
    ring: Mutex<VecDeque<String>>,
    ring_capacity: usize,
}

impl Inner {
    fn remember(&self, buf: &[u8]) {
        let text = String::from_utf8_lossy(buf);
        if let Ok(mut ring) = self.ring.lock() {
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                if ring.len() == self.ring_capacity {
                    ring.pop_front();
                }
                ring.push_back(line.to_string());
            }
        }
    }
}

/// Writer handed to the tracing subscriber
#[derive(Clone)]
pub struct RollingWriter {
    inner: Arc<Inner>,
}

impl RollingWriter {
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: &str,
        max_files: usize,
        ring_capacity: usize,
    ) -> Result<Self, LoggerError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            inner: Arc::new(Inner {
                file: Mutex::new(RollingFile::new(dir, prefix, max_files)),
                ring: Mutex::new(VecDeque::with_capacity(ring_capacity)),
                ring_capacity: ring_capacity.max(1),
            }),
        })
    }

    fn write_dated(&self, date: NaiveDate, buf: &[u8]) -> io::Result<()> {
        {
            let mut file = self
                .inner
                .file
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
            file.write_at(date, buf)?;
        }
        self.inner.remember(buf);
        Ok(())
    }

    /// Most recent lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.inner
            .ring
            .lock()
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_dated(chrono::Local::now().date_naive(), buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .inner
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the global logger writing into `log_dir`
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let writer = RollingWriter::new(
        log_dir.as_ref(),
        app_name,
        DEFAULT_MAX_FILES,
        DEFAULT_RING_CAPACITY,
    )?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer.clone())
        .try_init()
        .map_err(|e| LoggerError::Init(e.to_string()))?;

    LOGGER
        .set(writer)
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    log::info!("{} logging to {}", app_name, log_dir.as_ref().display());
    Ok(())
}

fn installed() -> Result<&'static RollingWriter, LoggerError> {
    LOGGER.get().ok_or(LoggerError::NotInitialized)
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    installed()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), LoggerError> {
    installed()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    installed()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Recent lines from the global logger, empty before `init_logger`
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|w| w.recent_lines()).unwrap_or_default()
}
