//! Writer resolution and the rotating file writer
//!
//! The facade treats on-disk output as a plain byte sink that manages
//! rotation internally: size-triggered roll-over to indexed backups,
//! gzip compression of the rotated segment, and count- and age-based
//! pruning of old segments.

use crate::config::HandlerConfig;
use crate::core::error::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const DAY: Duration = Duration::from_secs(24 * 3600);

/// Rotation limits for one rolling writer.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingLimits {
    /// Roll the file over once it reaches this many bytes
    pub max_bytes: u64,
    /// Prune rotated segments older than this
    pub max_age: Duration,
    /// Maximum rotated segments kept
    pub max_backups: usize,
    /// Gzip rotated segments
    pub compress: bool,
}

impl Default for RollingLimits {
    fn default() -> Self {
        Self {
            max_bytes: 20 * 1024 * 1024,
            max_age: 30 * DAY,
            max_backups: 10,
            compress: true,
        }
    }
}

impl RollingLimits {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    fn from_config(config: &HandlerConfig) -> Self {
        Self {
            max_bytes: config.max_mbs * 1024 * 1024,
            max_age: Duration::from_secs(config.max_days * 24 * 3600),
            max_backups: config.max_backups,
            compress: true,
        }
    }
}

/// A byte sink that rotates its backing file. Rotation shifts the indexed
/// backups (`app.log.1` is the newest), compresses the fresh backup, and
/// prunes segments beyond the count or age limits.
pub struct RollingWriter {
    base_path: PathBuf,
    limits: RollingLimits,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RollingWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_limits(path, RollingLimits::default())
    }

    pub fn with_limits<P: AsRef<Path>>(path: P, limits: RollingLimits) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        let file = Self::open_append(&base_path)?;
        let current_size = file
            .metadata()
            .map_err(|e| {
                Error::writer_provisioning(
                    base_path.display().to_string(),
                    format!("cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok(Self {
            base_path,
            limits,
            writer: Some(BufWriter::new(file)),
            current_size,
        })
    }

    fn open_append(path: &Path) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                Error::writer_provisioning(
                    path.display().to_string(),
                    format!("failed to open: {}", e),
                )
            })
    }

    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    pub fn limits(&self) -> &RollingLimits {
        &self.limits
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    fn should_rotate(&self) -> bool {
        self.limits.max_bytes > 0 && self.current_size >= self.limits.max_bytes
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                Error::rotation(
                    self.base_path.display().to_string(),
                    format!("failed to flush before rotation: {}", e),
                )
            })?;
        }

        // Drop whatever would fall off the end of the index.
        let oldest = self.backup_path(self.limits.max_backups);
        let oldest_compressed = compressed_path(&oldest);
        if oldest_compressed.exists() {
            let _ = fs::remove_file(&oldest_compressed);
        }
        if oldest.exists() {
            let _ = fs::remove_file(&oldest);
        }

        // Shift surviving backups up by one index, newest last so nothing
        // is overwritten.
        for i in (1..self.limits.max_backups).rev() {
            let old_path = self.backup_path(i);
            let new_path = self.backup_path(i + 1);
            let old_compressed = compressed_path(&old_path);
            let new_compressed = compressed_path(&new_path);

            if old_compressed.exists() {
                if fs::rename(&old_compressed, &new_compressed).is_err() {
                    let _ = fs::remove_file(&new_compressed);
                    let _ = fs::rename(&old_compressed, &new_compressed);
                }
            } else if old_path.exists() {
                if fs::rename(&old_path, &new_path).is_err() {
                    let _ = fs::remove_file(&new_path);
                    fs::rename(&old_path, &new_path).map_err(|e| {
                        Error::rotation(
                            old_path.display().to_string(),
                            format!("failed to shift backups: {}", e),
                        )
                    })?;
                }
            }
        }

        if self.base_path.exists() {
            let backup = self.backup_path(1);
            fs::rename(&self.base_path, &backup).map_err(|e| {
                Error::rotation(
                    self.base_path.display().to_string(),
                    format!("failed to rotate current file: {}", e),
                )
            })?;

            if self.limits.compress {
                self.compress_file(&backup)?;
            }
        }

        self.prune_aged();

        let file = Self::open_append(&self.base_path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;

        Ok(())
    }

    /// Compress one rotated segment with a transactional temp file: the
    /// original is removed only after the compressed copy is complete.
    fn compress_file(&self, path: &Path) -> Result<()> {
        let gz_path = compressed_path(path);
        let tmp_path = path.with_extension("gz.tmp");

        let result = (|| -> io::Result<()> {
            let mut input = io::BufReader::new(File::open(path)?);
            let output = BufWriter::new(File::create(&tmp_path)?);
            let mut encoder =
                flate2::write::GzEncoder::new(output, flate2::Compression::default());
            io::copy(&mut input, &mut encoder)?;
            encoder.finish()?.flush()?;
            fs::rename(&tmp_path, &gz_path)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::rotation(
                path.display().to_string(),
                format!("compression failed: {}", e),
            ));
        }

        if let Err(e) = fs::remove_file(path) {
            eprintln!(
                "[fanlog] compressed {} but could not remove the original: {}",
                path.display(),
                e
            );
        }

        Ok(())
    }

    /// Remove rotated segments older than the age limit.
    fn prune_aged(&self) {
        if self.limits.max_age.is_zero() {
            return;
        }
        let now = SystemTime::now();
        for i in 1..=self.limits.max_backups {
            for candidate in [self.backup_path(i), compressed_path(&self.backup_path(i))] {
                let Ok(metadata) = fs::metadata(&candidate) else {
                    continue;
                };
                let Ok(modified) = metadata.modified() else {
                    continue;
                };
                let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
                if age > self.limits.max_age {
                    let _ = fs::remove_file(&candidate);
                }
            }
        }
    }
}

fn compressed_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.should_rotate() {
            if let Err(e) = self.rotate() {
                // Keep logging into the current file rather than lose the
                // record; size tracking restarts so rotation is retried
                // later instead of on every write.
                eprintln!("[fanlog] rotation failed: {}, continuing with current file", e);
                if self.writer.is_none() {
                    let file = Self::open_append(&self.base_path)
                        .map_err(|e| io::Error::other(e.to_string()))?;
                    self.writer = Some(BufWriter::new(file));
                }
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::other("writer not initialized"))?;
        let written = writer.write(buf)?;
        self.current_size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for RollingWriter {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

/// Resolve a handler block's output into a byte sink. `file` provisions the
/// parent directory and a rolling writer; `stdout` or anything unrecognized
/// resolves to standard output. Stateless construction step.
pub(crate) fn resolve_writer(
    name: &str,
    config: &HandlerConfig,
) -> Result<Box<dyn Write + Send>> {
    match config.output.as_str() {
        super::OUTPUT_FILE => {
            if config.filename.is_empty() {
                return Err(Error::empty_filename(name));
            }
            let path = Path::new(&config.filename);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    create_log_dir(parent).map_err(|e| {
                        Error::writer_provisioning(
                            parent.display().to_string(),
                            format!("failed to create directory: {}", e),
                        )
                    })?;
                }
            }
            let writer = RollingWriter::with_limits(path, RollingLimits::from_config(config))?;
            Ok(Box::new(writer))
        }
        _ => Ok(Box::new(io::stdout())),
    }
}

#[cfg(unix)]
fn create_log_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o750).create(path)
}

#[cfg(not(unix))]
fn create_log_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_limits_defaults() {
        let limits = RollingLimits::default();
        assert_eq!(limits.max_bytes, 20 * 1024 * 1024);
        assert_eq!(limits.max_age, Duration::from_secs(30 * 24 * 3600));
        assert_eq!(limits.max_backups, 10);
        assert!(limits.compress);
    }

    #[test]
    fn test_limits_builder() {
        let limits = RollingLimits::new()
            .with_max_bytes(1024)
            .with_max_backups(3)
            .with_compression(false);
        assert_eq!(limits.max_bytes, 1024);
        assert_eq!(limits.max_backups, 3);
        assert!(!limits.compress);
    }

    #[test]
    fn test_writer_creation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = RollingWriter::new(&path).unwrap();
        assert_eq!(writer.path(), path);
        assert_eq!(writer.current_size(), 0);
    }

    #[test]
    fn test_rotation_produces_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rotate.log");
        let limits = RollingLimits::new()
            .with_max_bytes(100)
            .with_max_backups(3)
            .with_compression(false);
        let mut writer = RollingWriter::with_limits(&path, limits).unwrap();

        for i in 0..20 {
            writeln!(writer, "line number {}", i).unwrap();
        }
        writer.flush().unwrap();

        assert!(dir.path().join("rotate.log.1").exists());
    }

    #[test]
    fn test_rotation_compresses_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zip.log");
        let limits = RollingLimits::new().with_max_bytes(64).with_max_backups(2);
        let mut writer = RollingWriter::with_limits(&path, limits).unwrap();

        for i in 0..10 {
            writeln!(writer, "compressible line {}", i).unwrap();
        }
        writer.flush().unwrap();

        assert!(dir.path().join("zip.log.1.gz").exists());
        assert!(!dir.path().join("zip.log.1").exists());
    }

    #[test]
    fn test_backup_count_bounded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("many.log");
        let limits = RollingLimits::new()
            .with_max_bytes(50)
            .with_max_backups(2)
            .with_compression(false);
        let mut writer = RollingWriter::with_limits(&path, limits).unwrap();

        for i in 0..100 {
            writeln!(writer, "entry {}", i).unwrap();
        }
        writer.flush().unwrap();

        let log_files = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_str().unwrap().starts_with("many.log"))
            .count();
        assert!(log_files <= 3); // current + 2 backups
    }

    #[test]
    fn test_resolve_writer_empty_filename() {
        let config = HandlerConfig {
            handler: "text".to_string(),
            output: "file".to_string(),
            ..HandlerConfig::default()
        };
        let err = match resolve_writer("text", &config) {
            Ok(_) => panic!("expected resolve_writer to fail"),
            Err(e) => e,
        };
        assert!(matches!(err, Error::EmptyFilename { .. }));
    }

    #[test]
    fn test_resolve_writer_creates_parent_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/app.log");
        let config = HandlerConfig {
            handler: "json".to_string(),
            output: "file".to_string(),
            filename: nested.to_str().unwrap().to_string(),
            ..HandlerConfig::default()
        };
        resolve_writer("json", &config).unwrap();
        assert!(nested.parent().unwrap().is_dir());
    }

    #[test]
    fn test_resolve_writer_unrecognized_output_falls_back_to_stdout() {
        let config = HandlerConfig {
            handler: "text".to_string(),
            output: "syslog".to_string(),
            ..HandlerConfig::default()
        };
        assert!(resolve_writer("text", &config).is_ok());
    }
}
