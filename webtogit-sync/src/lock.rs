//! Advisory per-repository lock held for the duration of fetch + commit.
//!
//! The lock is an exclusive OS file lock (`flock`/`LockFileEx` via `fs2`) on
//! `.webtogit.lock`. The kernel drops it when the holder exits, however it
//! exits, so a leftover file from an interrupted run never blocks the next
//! sync. A second live process fails that repository with
//! [`SyncError::Locked`]. The file holds the current holder's pid for humans.

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use webtogit_core::paths;

use crate::error::{io_err, SyncError};

#[derive(Debug)]
pub struct RepoLock {
    path: PathBuf,
    // Closing the handle releases the lock.
    _file: File,
}

impl RepoLock {
    pub fn acquire(repo_path: &Path) -> Result<Self, SyncError> {
        let path = paths::lock_path(repo_path);
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| io_err(&path, e))?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                return Err(SyncError::Locked {
                    path: repo_path.to_path_buf(),
                    lock: path,
                });
            }
            return Err(io_err(&path, e));
        }

        // Informational only; a failed write does not weaken the lock.
        if let Err(err) = record_holder(&mut file) {
            tracing::warn!(path = %path.display(), error = %err, "failed to record lock holder");
        }
        Ok(Self { path, _file: file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record_holder(file: &mut File) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{}", std::process::id())
}
