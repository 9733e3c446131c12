//! Local atomic file replacement.
//!
//! Content is written to a sibling temporary file, the original's
//! metadata (owner, mode, POSIX ACL, xattrs, SELinux context) is copied
//! onto the temporary, and only then is the temporary renamed over the
//! destination. The real path therefore never exposes partially-written
//! content or wrong metadata. ACL/xattr/SELinux propagation is
//! best-effort: the tools may be absent on minimal systems.

use std::fs;
use std::io::Write as _;
use std::os::unix::fs::{MetadataExt as _, PermissionsExt as _};
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::FileError;

/// Atomically replace `path` with `content`.
///
/// Preconditions: `path` must be absolute, and an existing entry at
/// `path` must be a regular non-symlink file with exactly one hard link.
///
/// # Errors
///
/// Returns a [`FileError`] on precondition violations and I/O failures.
pub(crate) fn atomic_write_local(path: &Path, content: &str) -> Result<(), FileError> {
    if !path.is_absolute() {
        return Err(FileError::NotAbsolute {
            kind: "local",
            path: path.to_path_buf(),
        });
    }
    let existing = match fs::symlink_metadata(path) {
        Ok(meta) => {
            if !meta.file_type().is_file() {
                return Err(FileError::NotRegularFile {
                    kind: "local",
                    path: path.to_path_buf(),
                });
            }
            if meta.nlink() > 1 {
                return Err(FileError::HardLinks {
                    path: path.to_path_buf(),
                    count: meta.nlink(),
                });
            }
            Some(meta)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(source) => {
            return Err(FileError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let parent = path.parent().unwrap_or_else(|| Path::new("/"));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!("{file_name}.tmp."))
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    tmp.write_all(content.as_bytes())
        .map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    if let Some(meta) = existing {
        copy_owner_and_mode(&meta, tmp.path()).map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        copy_acl(path, tmp.path());
        copy_xattr(path, tmp.path());
        copy_selinux_context(path, tmp.path());
    }
    tmp.persist(path).map_err(|e| FileError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    debug!(path = %path.display(), "atomically replaced local file");
    Ok(())
}

fn copy_owner_and_mode(meta: &fs::Metadata, tmp: &Path) -> std::io::Result<()> {
    std::os::unix::fs::chown(tmp, Some(meta.uid()), Some(meta.gid()))?;
    fs::set_permissions(tmp, fs::Permissions::from_mode(meta.mode()))
}

/// Run a metadata-propagation command, logging failures instead of
/// surfacing them.
fn best_effort(mut command: Command) {
    match command.output() {
        Ok(output) if output.status.success() => {}
        Ok(output) => {
            debug!(
                command = ?command,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "metadata propagation skipped"
            );
        }
        Err(e) => debug!(command = ?command, error = %e, "metadata propagation skipped"),
    }
}

fn copy_acl(old: &Path, new: &Path) {
    if which::which("getfacl").is_err() || which::which("setfacl").is_err() {
        return;
    }
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(format!(
        "getfacl --absolute-names -- '{}' | setfacl --set-file=- -- '{}'",
        old.display(),
        new.display()
    ));
    best_effort(cmd);
}

fn copy_xattr(old: &Path, new: &Path) {
    let mut cmd = Command::new("cp");
    cmd.args(["--attributes-only", "--preserve=xattr", "--"])
        .arg(old)
        .arg(new);
    best_effort(cmd);
}

fn copy_selinux_context(old: &Path, new: &Path) {
    if which::which("getenforce").is_err() || which::which("chcon").is_err() {
        return;
    }
    let enforcing = Command::new("getenforce")
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim() != "Disabled")
        .unwrap_or(false);
    if !enforcing {
        return;
    }
    let mut cmd = Command::new("chcon");
    cmd.arg(format!("--reference={}", old.display()))
        .arg("--")
        .arg(new);
    best_effort(cmd);
}
