use crate::error::ErrorCode;
use fs2::FileExt;
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

/// Advisory lock errors for the store file.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("store lock timed out after {waited:?} at {}", .path.display())]
    Timeout { path: PathBuf, waited: Duration },

    #[error("store lock I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl LockError {
    /// A lock failure always means the store is unusable right now.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::StoreUnavailable
    }
}

#[derive(Clone, Copy)]
enum LockKind {
    Shared,
    Exclusive,
}

#[derive(Debug)]
struct FileGuard {
    file: File,
    path: PathBuf,
}

impl FileGuard {
    fn acquire(path: &Path, timeout: Duration, kind: LockKind) -> Result<Self, LockError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let start = Instant::now();
        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(path)?;

            let contended = match kind {
                LockKind::Shared => FileExt::try_lock_shared(&file).is_err(),
                LockKind::Exclusive => FileExt::try_lock_exclusive(&file).is_err(),
            };

            if !contended {
                return Ok(Self {
                    file,
                    path: path.to_path_buf(),
                });
            }

            if start.elapsed() >= timeout {
                return Err(LockError::Timeout {
                    path: path.to_path_buf(),
                    waited: start.elapsed(),
                });
            }

            thread::sleep(Duration::from_millis(10));
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Shared lock held while reading the store file.
#[derive(Debug)]
pub struct StoreReadLock {
    guard: FileGuard,
}

impl StoreReadLock {
    /// Block until no writer holds `path`, up to `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Timeout`] if a writer holds the lock past `timeout`.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        Ok(Self {
            guard: FileGuard::acquire(path, timeout, LockKind::Shared)?,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.guard.path()
    }
}

/// Exclusive lock held while rewriting the store file.
#[derive(Debug)]
pub struct StoreWriteLock {
    guard: FileGuard,
}

impl StoreWriteLock {
    /// Block until no reader or writer holds `path`, up to `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Timeout`] if any other holder keeps the lock past `timeout`.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        Ok(Self {
            guard: FileGuard::acquire(path, timeout, LockKind::Exclusive)?,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.guard.path()
    }
}

#[cfg(test)]
mod tests {
    use super::{LockError, StoreReadLock, StoreWriteLock};
    use crate::error::ErrorCode;
    use std::{
        sync::{Arc, Barrier},
        thread,
        time::Duration,
    };
    use tempfile::TempDir;

    #[test]
    fn write_lock_acquires_and_releases() -> Result<(), LockError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("store.lock");
        {
            let lock = StoreWriteLock::acquire(&path, Duration::from_millis(50))?;
            assert_eq!(lock.path(), path.as_path());
        }
        let _again = StoreWriteLock::acquire(&path, Duration::from_millis(50))?;
        Ok(())
    }

    #[test]
    fn write_lock_times_out_when_held() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("store.lock");
        let _guard = StoreWriteLock::acquire(&path, Duration::from_millis(50)).expect("first");
        let err = StoreWriteLock::acquire(&path, Duration::from_millis(20)).expect_err("held");

        assert!(matches!(err, LockError::Timeout { path: ref p, .. } if *p == path));
        assert_eq!(err.code(), ErrorCode::StoreUnavailable);
    }

    #[test]
    fn read_locks_are_compatible() -> Result<(), LockError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("store.lock");
        let _first = StoreReadLock::acquire(&path, Duration::from_millis(50))?;
        let _second = StoreReadLock::acquire(&path, Duration::from_millis(50))?;
        Ok(())
    }

    #[test]
    fn writer_blocks_readers_until_released() -> Result<(), LockError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("store.lock");

        let held = Arc::new(Barrier::new(2));
        let done = Arc::new(Barrier::new(2));

        let held_thread = Arc::clone(&held);
        let done_thread = Arc::clone(&done);
        let path_in_thread = path.clone();
        let handle = thread::spawn(move || {
            let _writer = StoreWriteLock::acquire(&path_in_thread, Duration::from_millis(200))
                .expect("writer acquires");
            held_thread.wait();
            done_thread.wait();
        });

        held.wait();
        assert!(matches!(
            StoreReadLock::acquire(&path, Duration::from_millis(20)),
            Err(LockError::Timeout { .. })
        ));
        done.wait();
        handle.join().expect("writer thread");

        let _reader = StoreReadLock::acquire(&path, Duration::from_millis(50))?;
        Ok(())
    }
}
