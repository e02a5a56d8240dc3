//! JSON-file-based storage backend.
//!
//! Stores all entries as one JSON object in `session.json` under a
//! configurable directory (default: `$XDG_DATA_HOME/monalisa/`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{MonalisaError, Result};

/// Application name used for the XDG data directory.
const APP_NAME: &str = "monalisa";

/// File holding the key-value entries.
const ENTRIES_FILE: &str = "session.json";

/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "storage.lock";

/// Entries as persisted on disk. Sorted for stable file contents.
type Entries = BTreeMap<String, String>;

/// File-backed key-value store that persists entries as JSON.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process safety is achieved via an advisory file lock
/// on `storage.lock`. Reads take a shared lock, writes an exclusive one.
///
/// # File layout
///
/// ```text
/// <dir>/
///   storage.lock          (cross-process lock sentinel)
///   session.json          ({"authToken": "..."})
/// ```
#[derive(Debug)]
pub struct FileStore {
    /// Root directory containing the entries file.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

impl FileStore {
    /// Creates a new file store rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist, and opens
    /// (or creates) the `storage.lock` sentinel file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        tracing::debug!(dir = %dir.display(), "opened file store");
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this application.
    ///
    /// On Linux: `$XDG_DATA_HOME/monalisa/` (typically
    /// `~/.local/share/monalisa/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                MonalisaError::Storage("could not determine platform data directory".into())
            })
    }

    /// Returns the directory this store writes to.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Returns the full path for a given file name.
    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Acquires an in-process mutex guard and a shared (read) file lock,
    /// executes `op`, then releases the file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        // Only surface the unlock error when the operation succeeded;
        // otherwise the original error is more useful.
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires an in-process mutex guard and an exclusive (write) file
    /// lock, executes `op`, then releases the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Reads the entries file. Returns an empty map if it does not exist.
    fn read_entries(&self) -> Result<Entries> {
        let path = self.path(ENTRIES_FILE);
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(MonalisaError::from),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Atomically writes the entries file (write-to-tmp then rename).
    fn write_entries(&self, entries: &Entries) -> Result<()> {
        let path = self.path(ENTRIES_FILE);
        let tmp_path = self.path(&format!("{ENTRIES_FILE}.tmp"));
        let json = serde_json::to_string_pretty(entries).map_err(MonalisaError::from)?;
        fs::write(&tmp_path, json).map_err(storage_io_error)?;
        fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
        Ok(())
    }

    /// Applies `op` to the entries under an exclusive lock and writes the
    /// result back.
    fn modify_entries<F: FnOnce(&mut Entries)>(&self, op: F) -> Result<()> {
        self.with_exclusive_lock(|| {
            let mut entries = self.read_entries()?;
            op(&mut entries);
            self.write_entries(&entries)
        })
    }
}

// ── Free-standing helpers ───────────────────────────────────────────────

/// Wraps an I/O error into a [`MonalisaError::Storage`].
fn storage_io_error(err: std::io::Error) -> MonalisaError {
    MonalisaError::Storage(Box::new(err))
}

/// Wraps a mutex poison error into a [`MonalisaError::Storage`].
fn lock_poison_error<T>(err: &std::sync::PoisonError<T>) -> MonalisaError {
    MonalisaError::Storage(err.to_string().into())
}

impl super::KeyValueStore for FileStore {
    #[inline]
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_shared_lock(|| {
            let mut entries = self.read_entries()?;
            Ok(entries.remove(key))
        })
    }

    #[inline]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        tracing::trace!(key = %key, "writing entry");
        self.modify_entries(|entries| {
            let _old = entries.insert(key.to_owned(), value.to_owned());
        })
    }

    #[inline]
    fn remove(&self, key: &str) -> Result<()> {
        tracing::trace!(key = %key, "removing entry");
        self.modify_entries(|entries| {
            let _old = entries.remove(key);
        })
    }
}
