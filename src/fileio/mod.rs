//! File reading and change-aware writing, local and remote.
//!
//! All writes go through atomic replacement ([`atomic`], [`remote`]).
//! The `write_*` functions implement the write-if-changed contract that
//! every higher-level "changed" report depends on: read, compare, and
//! only replace on a difference — an unchanged file is never touched, so
//! repeated provisioning runs cause no mtime or metadata churn.

mod atomic;
mod remote;

use std::path::Path;

use tracing::debug;

pub(crate) use atomic::atomic_write_local;
pub(crate) use remote::atomic_write_remote;

use crate::error::FileError;
use crate::exec::Executor;
use crate::session::Project;

/// Read a local file, failing if it cannot be read.
///
/// # Errors
///
/// Returns [`FileError::Read`] on any I/O failure, including absence.
pub fn read_local_file(path: &Path) -> Result<String, FileError> {
    std::fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a local file, treating absence (or unreadability) as `None`.
///
/// This is the opt-out read path for create-if-missing logic: the caller
/// sees a sentinel instead of an abort. Unexpected failures are logged.
///
/// # Errors
///
/// This function currently never fails; the `Result` keeps the signature
/// aligned with [`read_local_file`].
pub fn read_local_file_if_exists(path: &Path) -> Result<Option<String>, FileError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "treating unreadable file as absent");
            }
            Ok(None)
        }
    }
}

/// Write a local file only when `content` differs from what is on disk.
///
/// Returns whether a write happened. The replacement is atomic and
/// preserves the original's metadata.
///
/// # Errors
///
/// Returns a [`FileError`] on precondition violations and I/O failures.
pub fn write_local_file(path: &Path, content: &str) -> Result<bool, FileError> {
    let old = read_local_file_if_exists(path)?;
    if old.as_deref() == Some(content) {
        return Ok(false);
    }
    atomic_write_local(path, content)?;
    Ok(true)
}

/// Read a file from the executor's target, failing if it is absent.
///
/// # Errors
///
/// Returns [`FileError::Download`] when the file is absent or the
/// transfer fails.
pub fn read_file(exec: &dyn Executor, path: &Path) -> Result<String, FileError> {
    match exec.download(path) {
        Ok(Some(content)) => Ok(content),
        Ok(None) => Err(FileError::Download {
            path: path.to_path_buf(),
            host: exec.host().to_string(),
        }),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "download failed");
            Err(FileError::Download {
                path: path.to_path_buf(),
                host: exec.host().to_string(),
            })
        }
    }
}

/// Read a file from the executor's target, treating absence as `None`.
///
/// Transfer failures are downgraded to `None` as well (and logged), so
/// callers can implement create-if-missing logic.
///
/// # Errors
///
/// This function currently never fails; the `Result` keeps the signature
/// aligned with [`read_file`].
pub fn read_file_if_exists(
    exec: &dyn Executor,
    path: &Path,
) -> Result<Option<String>, FileError> {
    match exec.download(path) {
        Ok(content) => Ok(content),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "treating failed download as absent");
            Ok(None)
        }
    }
}

/// Write a file on the executor's target only when `content` differs.
///
/// Returns whether a write happened.
///
/// # Errors
///
/// Returns a [`FileError`] on precondition violations and transfer
/// failures.
pub fn write_file(exec: &dyn Executor, path: &Path, content: &str) -> Result<bool, FileError> {
    let old = read_file_if_exists(exec, path)?;
    if old.as_deref() == Some(content) {
        return Ok(false);
    }
    atomic_write_remote(exec, path, content)?;
    Ok(true)
}

/// Copy a file from the project's `files/` directory to the target.
///
/// `local_name` is resolved under `<project>/files/`; the directory and
/// the file must exist. Returns whether the remote file changed.
///
/// # Errors
///
/// Returns [`FileError::FilesDirMissing`] or
/// [`FileError::CopySourceMissing`] when the conventional layout is
/// violated, plus any read or write failure.
pub fn copy_file(
    exec: &dyn Executor,
    project: &Project,
    local_name: &str,
    remote_path: &Path,
) -> Result<bool, FileError> {
    let files_dir = project.files_dir();
    if !files_dir.is_dir() {
        return Err(FileError::FilesDirMissing { path: files_dir });
    }
    let source = files_dir.join(local_name);
    if !source.is_file() {
        return Err(FileError::CopySourceMissing { path: source });
    }
    let content = read_local_file(&source)?;
    write_file(exec, remote_path, &content)
}
