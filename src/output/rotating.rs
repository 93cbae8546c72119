//! Size-rotated log file.
//!
//! The active file keeps its configured name. When a write would push it past the
//! size limit, it is renamed to `<stem>-<UTC timestamp>.<ext>` and a fresh file
//! takes its place. Retention (count, age, gzip) is scheduled after every rotation
//! and runs in the background.

use super::Output;
use super::retention;
use crate::error::Error;
use crate::internal;
use chrono::{DateTime, TimeDelta, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

const MEGABYTE: u64 = 1024 * 1024;
const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// Parameters of a rotating file, exactly as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Path of the active file; backups are created next to it.
    pub filename: PathBuf,
    /// Megabytes before rotation. 0 means 100.
    pub max_size: u64,
    /// Rotated files to keep. 0 keeps all.
    pub max_backups: usize,
    /// Days to keep rotated files. 0 keeps them regardless of age.
    pub max_age: u64,
    /// Gzip rotated files.
    pub compress: bool,
}

impl RotationPolicy {
    /// Policy for `filename` with every limit at its default.
    #[must_use]
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            max_size: 0,
            max_backups: 0,
            max_age: 0,
            compress: false,
        }
    }

    /// Size limit in megabytes. 0 means 100.
    #[must_use]
    pub const fn max_size(mut self, megabytes: u64) -> Self {
        self.max_size = megabytes;
        self
    }

    /// Backups to keep. 0 keeps all.
    #[must_use]
    pub const fn max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    /// Days to keep backups. 0 keeps them regardless of age.
    #[must_use]
    pub const fn max_age(mut self, days: u64) -> Self {
        self.max_age = days;
        self
    }

    /// Gzip backups after rotation.
    #[must_use]
    pub const fn compress(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Effective size limit in bytes.
    #[must_use]
    pub const fn max_bytes(&self) -> u64 {
        let mb = if self.max_size == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            self.max_size
        };
        mb.saturating_mul(MEGABYTE)
    }

    fn dir(&self) -> &Path {
        self.filename
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

#[derive(Default)]
struct ActiveFile {
    file: Option<File>,
    size: u64,
    /// Backup names must sort in rotation order even when the clock hasn't moved.
    last_rotation: Option<DateTime<Utc>>,
}

/// Opens lazily on first write; one writer at a time.
pub struct RotatingFile {
    policy: RotationPolicy,
    active: Mutex<ActiveFile>,
    miller: retention::Miller,
}

impl RotatingFile {
    /// Rotating file for `policy`. Nothing is opened until the first write.
    #[must_use]
    pub fn new(policy: RotationPolicy) -> Self {
        Self {
            miller: retention::Miller::new(policy.clone()),
            policy,
            active: Mutex::new(ActiveFile::default()),
        }
    }

    /// Parameters this file was built with.
    #[must_use]
    pub const fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Forces a rotation now, regardless of size.
    ///
    /// # Errors
    /// I/O errors while renaming or creating files.
    pub fn rotate(&self) -> Result<(), Error> {
        let mut active = self.lock();
        self.rotate_locked(&mut active)
    }

    /// Blocks until the retention passes triggered so far (pruning, compression)
    /// have finished. Rotation itself never waits for them.
    pub fn wait_for_retention(&self) {
        self.miller.wait();
    }

    fn lock(&self) -> MutexGuard<'_, ActiveFile> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends to an existing file when the pending write fits, otherwise rotates.
    fn open_existing_or_new(&self, active: &mut ActiveFile, write_len: u64) -> Result<(), Error> {
        let meta = match fs::metadata(&self.policy.filename) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return self.open_new(active),
            Err(e) => return Err(e.into()),
        };

        if meta.len().saturating_add(write_len) >= self.policy.max_bytes() {
            return self.rotate_locked(active);
        }

        match OpenOptions::new().append(true).open(&self.policy.filename) {
            Ok(file) => {
                active.file = Some(file);
                active.size = meta.len();
                Ok(())
            }
            // Unreadable leftovers shouldn't block logging; start over
            Err(_) => self.open_new(active),
        }
    }

    /// Moves any existing file to a backup name and creates an empty one.
    fn open_new(&self, active: &mut ActiveFile) -> Result<(), Error> {
        let filename = &self.policy.filename;
        fs::create_dir_all(self.policy.dir())?;

        if filename.exists() {
            let now = Utc::now();
            let at = match active.last_rotation {
                Some(last) if last >= now => last + TimeDelta::milliseconds(1),
                _ => now,
            };
            let (backup, at) = retention::backup_name(&self.policy, at);
            fs::rename(filename, &backup)?;
            active.last_rotation = Some(at);
            internal::debug("ROTATE", &format!("Rotated to {}", backup.display()));
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(filename)?;
        active.file = Some(file);
        active.size = 0;
        Ok(())
    }

    fn rotate_locked(&self, active: &mut ActiveFile) -> Result<(), Error> {
        if let Some(mut file) = active.file.take() {
            file.flush()?;
        }
        self.open_new(active)?;
        self.miller.request();
        Ok(())
    }
}

impl Output for RotatingFile {
    fn write(&self, buf: &[u8]) -> Result<(), Error> {
        let len = buf.len() as u64;
        let max = self.policy.max_bytes();
        if len > max {
            return Err(Error::Write(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("write length {len} exceeds maximum file size {max}"),
            )));
        }

        let mut active = self.lock();
        if active.file.is_none() {
            self.open_existing_or_new(&mut active, len)?;
        }
        if active.size.saturating_add(len) > max {
            self.rotate_locked(&mut active)?;
        }

        let Some(file) = active.file.as_mut() else {
            return Err(Error::Write(io::Error::other("log file is not open")));
        };
        file.write_all(buf)?;
        active.size += len;
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        if let Some(file) = self.lock().file.as_mut() {
            file.sync_data()?;
        }
        Ok(())
    }
}
