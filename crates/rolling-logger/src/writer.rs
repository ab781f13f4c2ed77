//! Size-rotated log file writer

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::LoggerError;

const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
const DEFAULT_MAX_FILES: usize = 5;

/// Where and how much to log
#[derive(Debug, Clone)]
pub struct RollingConfig {
    pub dir: PathBuf,
    pub app_name: String,
    /// Size at which the active file is rotated
    pub max_bytes: u64,
    /// Files kept, including the active one
    pub max_files: usize,
}

impl RollingConfig {
    pub fn new(dir: impl Into<PathBuf>, app_name: &str) -> Self {
        Self {
            dir: dir.into(),
            app_name: app_name.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
            max_files: DEFAULT_MAX_FILES,
        }
    }

    pub fn with_limits(mut self, max_bytes: u64, max_files: usize) -> Self {
        self.max_bytes = max_bytes;
        self.max_files = max_files.max(1);
        self
    }

    /// `<app>.log` for the active file, `<app>.<n>.log` for rotated ones
    pub fn file_path(&self, index: usize) -> PathBuf {
        if index == 0 {
            self.dir.join(format!("{}.log", self.app_name))
        } else {
            self.dir.join(format!("{}.{}.log", self.app_name, index))
        }
    }
}

struct RollingFile {
    config: RollingConfig,
    file: File,
    size: u64,
}

impl RollingFile {
    fn open(config: RollingConfig) -> io::Result<Self> {
        fs::create_dir_all(&config.dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.file_path(0))?;
        let size = file.metadata()?.len();
        Ok(Self { config, file, size })
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let last = self.config.max_files.saturating_sub(1);
        if last > 0 {
            let oldest = self.config.file_path(last);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (0..last).rev() {
                let from = self.config.file_path(index);
                if from.exists() {
                    fs::rename(&from, self.config.file_path(index + 1))?;
                }
            }
        }
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.config.file_path(0))?;
        self.size = 0;
        Ok(())
    }

    fn write_record(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len() as u64;
        if self.size > 0 && self.size + len > self.config.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.size += len;
        Ok(buf.len())
    }
}

/// Cloneable handle to the active log file; usable as a `MakeWriter`
#[derive(Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<RollingFile>>,
}

impl RollingWriter {
    pub fn open(config: RollingConfig) -> Result<Self, LoggerError> {
        let path = config.dir.clone();
        let file = RollingFile::open(config).map_err(|source| LoggerError::Io { path, source })?;
        Ok(Self {
            inner: Arc::new(Mutex::new(file)),
        })
    }

    /// Path of the active file
    pub fn current_path(&self) -> Option<PathBuf> {
        self.inner.lock().ok().map(|f| f.config.file_path(0))
    }

    /// Mark the start of a run in the file
    pub fn write_banner(&self) {
        let name = match self.inner.lock() {
            Ok(file) => file.config.app_name.clone(),
            Err(_) => return,
        };
        let line = format!(
            "=== {} started {} ===\n",
            name,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        let mut writer = self.clone();
        let _ = writer.write_all(line.as_bytes());
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log writer poisoned"))?;
        file.write_record(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log writer poisoned"))?;
        file.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
