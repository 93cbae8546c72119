//! Backup naming and the post-rotation retention pass.
//!
//! Retention enforces the backup-count and age limits together and gzips what
//! remains when compression is on. Passes run on a background thread.

use super::RotationPolicy;
use crate::error::Error;
use crate::internal;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, OnceLock};
use std::thread;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";

/// A rotated file found next to the active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Backup {
    pub path: PathBuf,
    pub rotated_at: NaiveDateTime,
    pub compressed: bool,
}

/// `stem` and `.ext` of the active file name; backups are `stem-<time>.ext`.
fn name_parts(policy: &RotationPolicy) -> (String, String) {
    let stem = policy
        .filename
        .file_stem()
        .map_or_else(|| "log".to_string(), |s| s.to_string_lossy().into_owned());
    let ext = policy
        .filename
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

/// First free backup name at or after `at`, and the time it encodes. Rotations
/// within the same millisecond move forward one millisecond at a time so no
/// backup is overwritten.
pub(super) fn backup_name(policy: &RotationPolicy, at: DateTime<Utc>) -> (PathBuf, DateTime<Utc>) {
    let (stem, ext) = name_parts(policy);
    let dir = policy.filename.parent().unwrap_or_else(|| Path::new(""));
    let mut at = at;
    loop {
        let candidate = dir.join(format!("{stem}-{}{ext}", at.format(BACKUP_TIME_FORMAT)));
        let compressed = PathBuf::from(format!("{}{COMPRESS_SUFFIX}", candidate.display()));
        if !candidate.exists() && !compressed.exists() {
            return (candidate, at);
        }
        at += Duration::milliseconds(1);
    }
}

/// Backups of `policy`'s file, newest first.
pub(super) fn list_backups(policy: &RotationPolicy) -> Result<Vec<Backup>, Error> {
    let (stem, ext) = name_parts(policy);
    let prefix = format!("{stem}-");
    let dir = policy.filename.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = dir.unwrap_or_else(|| Path::new("."));

    let mut backups = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let (plain, compressed) = name
            .strip_suffix(COMPRESS_SUFFIX)
            .map_or((name.as_str(), false), |n| (n, true));

        let Some(stamp) = plain
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(ext.as_str()))
        else {
            continue;
        };
        if let Ok(rotated_at) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT) {
            backups.push(Backup {
                path: entry.path(),
                rotated_at,
                compressed,
            });
        }
    }

    backups.sort_by(|a, b| b.rotated_at.cmp(&a.rotated_at));
    Ok(backups)
}

/// Removes backups beyond the count or age limits, then compresses survivors.
pub(super) fn mill(policy: &RotationPolicy) -> Result<(), Error> {
    if !has_retention(policy) {
        return Ok(());
    }

    let backups = list_backups(policy)?;
    let mut keep = Vec::new();
    let mut remove = Vec::new();

    if policy.max_backups > 0 {
        // A backup caught mid-compression exists twice; both copies count once
        let mut seen = HashSet::new();
        for backup in backups {
            seen.insert(backup.rotated_at);
            if seen.len() > policy.max_backups {
                remove.push(backup);
            } else {
                keep.push(backup);
            }
        }
    } else {
        keep = backups;
    }

    if policy.max_age > 0 {
        let days = i64::try_from(policy.max_age).unwrap_or(i64::MAX / 86_400);
        let cutoff = Utc::now().naive_utc() - Duration::days(days);
        let (old, fresh): (Vec<_>, Vec<_>) =
            keep.into_iter().partition(|b| b.rotated_at < cutoff);
        remove.extend(old);
        keep = fresh;
    }

    for backup in &remove {
        internal::debug("RETENTION", &format!("Removing {}", backup.path.display()));
        fs::remove_file(&backup.path)?;
    }

    if policy.compress {
        for backup in keep.iter().filter(|b| !b.compressed) {
            compress_file(&backup.path)?;
        }
    }

    Ok(())
}

/// Gzips `path` into `<path>.gz`, then removes `path`. A partial `.gz` is
/// removed if compression fails.
pub(super) fn compress_file(path: &Path) -> Result<(), Error> {
    let gz_path = PathBuf::from(format!("{}{COMPRESS_SUFFIX}", path.display()));
    if let Err(e) = gzip_into(path, &gz_path) {
        let _ = fs::remove_file(&gz_path);
        return Err(e);
    }
    fs::remove_file(path)?;
    Ok(())
}

fn gzip_into(src: &Path, dst: &Path) -> Result<(), Error> {
    let mut input = BufReader::new(File::open(src)?);
    let mut gz = GzEncoder::new(BufWriter::new(File::create(dst)?), Compression::default());
    io::copy(&mut input, &mut gz)?;
    gz.finish()?.flush()?;
    Ok(())
}

enum Request {
    Mill,
    /// Answered once every request queued before it has been handled.
    Wait(mpsc::Sender<()>),
}

/// Runs retention passes on a dedicated thread so rotation never waits on
/// pruning or compression. The thread starts with the first request and exits
/// once its owner is dropped.
pub(super) struct Miller {
    policy: RotationPolicy,
    /// Set while a pass is queued but not yet started.
    pending: Arc<AtomicBool>,
    /// `None` when the thread could not be spawned; passes then run inline.
    queue: OnceLock<Option<Sender<Request>>>,
}

impl Miller {
    pub(super) fn new(policy: RotationPolicy) -> Self {
        Self {
            policy,
            pending: Arc::new(AtomicBool::new(false)),
            queue: OnceLock::new(),
        }
    }

    /// Schedules a pass. A pass already queued and not yet started covers this one.
    pub(super) fn request(&self) {
        if !has_retention(&self.policy) {
            return;
        }
        let Some(queue) = self.queue() else {
            run_mill(&self.policy);
            return;
        };
        if self.pending.swap(true, Ordering::AcqRel) {
            return;
        }
        if queue.send(Request::Mill).is_err() {
            self.pending.store(false, Ordering::Release);
            run_mill(&self.policy);
        }
    }

    /// Blocks until every pass requested so far has finished.
    pub(super) fn wait(&self) {
        let Some(Some(queue)) = self.queue.get() else {
            return;
        };
        let (done, finished) = mpsc::channel();
        if queue.send(Request::Wait(done)).is_ok() {
            let _ = finished.recv();
        }
    }

    fn queue(&self) -> Option<&Sender<Request>> {
        self.queue
            .get_or_init(|| {
                let (tx, rx) = mpsc::channel();
                let policy = self.policy.clone();
                let pending = Arc::clone(&self.pending);
                match thread::Builder::new()
                    .name("sharedlog-retention".to_string())
                    .spawn(move || serve(&policy, &pending, &rx))
                {
                    Ok(_) => Some(tx),
                    Err(e) => {
                        internal::warn(
                            "RETENTION",
                            &format!("Retention thread unavailable, running inline: {e}"),
                        );
                        None
                    }
                }
            })
            .as_ref()
    }
}

fn serve(policy: &RotationPolicy, pending: &AtomicBool, requests: &Receiver<Request>) {
    for request in requests {
        match request {
            Request::Mill => {
                pending.store(false, Ordering::Release);
                run_mill(policy);
            }
            Request::Wait(done) => {
                let _ = done.send(());
            }
        }
    }
}

fn run_mill(policy: &RotationPolicy) {
    if let Err(e) = mill(policy) {
        internal::warn("RETENTION", &format!("Retention pass failed: {e}"));
    }
}

const fn has_retention(policy: &RotationPolicy) -> bool {
    policy.max_backups > 0 || policy.max_age > 0 || policy.compress
}
