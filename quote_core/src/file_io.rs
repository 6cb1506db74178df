//! # Draft Files
//!
//! Quote drafts are saved as `.tqd` files holding the draft's JSON. Saving
//! goes through a `.tqd.tmp` sibling that is synced and renamed over the
//! target, so an interrupted save never leaves a half-written draft.
//!
//! Two people editing the same draft from a shared folder is guarded by a
//! `.tqd.lock` file: an OS-level lock (fs2) plus JSON naming who holds it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use quote_core::file_io::{load_draft, save_draft, DraftLock};
//! use quote_core::quote::QuoteDraft;
//! use std::path::Path;
//!
//! let path = Path::new("smith-bathroom.tqd");
//! let lock = DraftLock::acquire(path, "estimator@example.com")?;
//!
//! save_draft(&QuoteDraft::new("Pat Smith"), path)?;
//! let draft = load_draft(path)?;
//! assert_eq!(draft.customer.name, "Pat Smith");
//!
//! drop(lock);
//! # Ok::<(), quote_core::errors::QuoteError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{QuoteError, QuoteResult};
use crate::quote::{QuoteDraft, SCHEMA_VERSION};

/// Extension used for draft files
pub const DRAFT_EXTENSION: &str = "tqd";

/// Locks older than this are treated as abandoned
const LOCK_MAX_AGE_HOURS: i64 = 12;

/// Contents of a `.tqd.lock` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock (email or name)
    pub holder: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(holder: impl Into<String>) -> Self {
        LockInfo {
            holder: holder.into(),
            machine: machine_name(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// "holder on machine"
    pub fn describe(&self) -> String {
        format!("{} on {}", self.holder, self.machine)
    }

    /// A lock is abandoned when it is too old, or when its process is gone
    /// from this machine.
    fn is_abandoned(&self) -> bool {
        if Utc::now() - self.locked_at > Duration::hours(LOCK_MAX_AGE_HOURS) {
            return true;
        }
        self.machine == machine_name() && !process_alive(self.pid)
    }
}

fn machine_name() -> String {
    ["HOSTNAME", "HOST", "COMPUTERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> bool {
    // No cheap liveness check; rely on lock age
    true
}

/// Exclusive hold on a draft file, released on drop
#[derive(Debug)]
pub struct DraftLock {
    draft_path: PathBuf,
    lock_path: PathBuf,
    _handle: File,
    pub info: LockInfo,
}

impl DraftLock {
    /// Take the lock on `path` for `holder`.
    ///
    /// Fails with [`QuoteError::FileLocked`] while someone else holds a live
    /// lock. Abandoned locks are taken over.
    pub fn acquire(path: &Path, holder: impl Into<String>) -> QuoteResult<Self> {
        let lock_path = lock_path_for(path);

        if let Some(existing) = read_lock_info(&lock_path).filter(|i| !i.is_abandoned()) {
            return Err(locked_error(path, &existing));
        }
        if lock_path.exists() {
            tracing::debug!(path = %lock_path.display(), "taking over abandoned lock");
        }

        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(io_error("create lock", &lock_path))?;

        handle
            .try_lock_exclusive()
            .map_err(|_| QuoteError::file_locked(path.display().to_string(), "another process", "unknown"))?;

        let info = LockInfo::new(holder);
        let json = serde_json::to_string_pretty(&info)?;
        handle
            .write_all(json.as_bytes())
            .and_then(|_| handle.sync_all())
            .map_err(io_error("write lock", &lock_path))?;

        tracing::debug!(path = %path.display(), holder = %info.holder, "draft locked");
        Ok(DraftLock {
            draft_path: path.to_path_buf(),
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Current live lock on `path`, if any, without taking it.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path)).filter(|i| !i.is_abandoned())
    }

    pub fn draft_path(&self) -> &Path {
        &self.draft_path
    }
}

impl Drop for DraftLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn locked_error(path: &Path, info: &LockInfo) -> QuoteError {
    QuoteError::file_locked(path.display().to_string(), info.describe(), info.locked_at.to_rfc3339())
}

fn io_error<'a>(operation: &'a str, path: &'a Path) -> impl FnOnce(std::io::Error) -> QuoteError + 'a {
    move |e| QuoteError::file_error(operation, path.display().to_string(), e.to_string())
}

/// `draft.tqd` → `draft.tqd.<suffix>`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.{suffix}", e.to_string_lossy()))
        .unwrap_or_else(|| suffix.to_string());
    path.with_extension(extension)
}

fn lock_path_for(path: &Path) -> PathBuf {
    sibling_path(path, "lock")
}

/// Unreadable or malformed lock files count as no lock.
fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Write a draft atomically.
///
/// ```rust,no_run
/// use quote_core::file_io::save_draft;
/// use quote_core::quote::QuoteDraft;
/// use std::path::Path;
///
/// save_draft(&QuoteDraft::new("Pat Smith"), Path::new("smith.tqd"))?;
/// # Ok::<(), quote_core::errors::QuoteError>(())
/// ```
pub fn save_draft(draft: &QuoteDraft, path: &Path) -> QuoteResult<()> {
    let json = serde_json::to_string_pretty(draft)?;
    let tmp_path = sibling_path(path, "tmp");

    let mut tmp = File::create(&tmp_path).map_err(io_error("create temp file", &tmp_path))?;
    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.sync_all())
        .map_err(io_error("write temp file", &tmp_path))?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error("replace draft", path)(e));
    }

    tracing::debug!(path = %path.display(), items = draft.items.len(), "draft saved");
    Ok(())
}

/// Read a draft, rejecting files written by an incompatible schema.
///
/// Line totals are recomputed from each item's inputs; stored totals are
/// ignored.
pub fn load_draft(path: &Path) -> QuoteResult<QuoteDraft> {
    let contents = fs::read_to_string(path).map_err(io_error("read", path))?;
    let mut draft: QuoteDraft = serde_json::from_str(&contents).map_err(|e| QuoteError::SerializationError {
        reason: format!("invalid draft {}: {}", path.display(), e),
    })?;
    validate_version(&draft.meta.version)?;
    draft.recompute();
    tracing::debug!(path = %path.display(), items = draft.items.len(), "draft loaded");
    Ok(draft)
}

/// Load a draft along with whoever currently holds its lock.
///
/// A `Some` lock means the caller should open the draft read-only.
pub fn load_draft_with_lock_check(path: &Path) -> QuoteResult<(QuoteDraft, Option<LockInfo>)> {
    let draft = load_draft(path)?;
    Ok((draft, DraftLock::check(path)))
}

fn parse_version(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.').map(|p| p.parse::<u32>().ok());
    let major = parts.next()??;
    let minor = parts.next().flatten().unwrap_or(0);
    Some((major, minor))
}

/// Same major version is required; while on 0.x a file from a newer minor
/// version is also rejected.
fn validate_version(file_version: &str) -> QuoteResult<()> {
    let mismatch = || QuoteError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let (file_major, file_minor) = parse_version(file_version).ok_or_else(mismatch)?;
    let (major, minor) = parse_version(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}
