//! Remote atomic file replacement through an [`Executor`].
//!
//! Mirrors the local algorithm step for step, with each step issued as a
//! discrete command on the target: probe the destination, upload to a
//! sibling temporary path, copy metadata from the original onto the
//! temporary, then `mv -f` over the destination. Metadata propagation
//! uses `--reference` tooling and is best-effort, matching the local
//! variant.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::{ExecError, FileError};
use crate::exec::Executor;

/// Build a unique sibling temporary path for `path`.
fn temp_sibling(path: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    PathBuf::from(format!(
        "{}.tmp.{}{}.tmp",
        path.display(),
        std::process::id(),
        nanos
    ))
}

/// Atomically replace `path` on the executor's target with `content`.
///
/// Preconditions match the local variant: absolute path; an existing
/// destination must be a regular non-symlink file with one hard link.
///
/// # Errors
///
/// Returns a [`FileError`] on precondition violations, transfer
/// failures, and failures of the probe or rename commands.
pub(crate) fn atomic_write_remote(
    exec: &dyn Executor,
    path: &Path,
    content: &str,
) -> Result<(), FileError> {
    if !path.is_absolute() {
        return Err(FileError::NotAbsolute {
            kind: "remote",
            path: path.to_path_buf(),
        });
    }
    let target = path.display().to_string();
    let exists = exec
        .run(&format!("if [ -e {target} ] ; then echo exists ; fi"))?
        .stdout
        .trim()
        == "exists";
    if exists {
        let probe = exec.run(&format!(
            "if [ ! -f {target} ] || [ -L {target} ] ; then echo notregular ; fi"
        ))?;
        if probe.stdout.trim() == "notregular" {
            return Err(FileError::NotRegularFile {
                kind: "remote",
                path: path.to_path_buf(),
            });
        }
        let stat = exec.run(&format!("stat --format '%h' -- {target}"))?;
        let nlink: u64 =
            stat.stdout
                .trim()
                .parse()
                .map_err(|_| ExecError::UnexpectedOutput {
                    command: format!("stat --format '%h' -- {target}"),
                    host: exec.host().to_string(),
                    output: stat.stdout.trim().to_string(),
                })?;
        if nlink > 1 {
            return Err(FileError::HardLinks {
                path: path.to_path_buf(),
                count: nlink,
            });
        }
    }
    let tmp_path = temp_sibling(path);
    let tmp = tmp_path.display().to_string();
    if let Err(e) = exec.upload(&tmp_path, content) {
        debug!(error = %e, "upload failed");
        return Err(FileError::Upload {
            path: tmp_path,
            host: exec.host().to_string(),
        });
    }
    if exists {
        copy_metadata(exec, &target, &tmp);
    }
    exec.run(&format!("mv -f -- {tmp} {target}"))?;
    debug!(path = %path.display(), host = exec.host(), "atomically replaced remote file");
    Ok(())
}

/// Copy owner, mode, ACL, xattrs, and SELinux context from `old` onto
/// `new`, tolerating missing tooling on the target.
fn copy_metadata(exec: &dyn Executor, old: &str, new: &str) {
    let best_effort = |command: String| {
        if let Ok(result) = exec.run_unchecked(&command) {
            if !result.success {
                debug!(command, stderr = %result.stderr.trim(), "metadata propagation skipped");
            }
        }
    };
    best_effort(format!("chown --reference={old} -- {new}"));
    best_effort(format!("chmod --reference={old} -- {new}"));
    if probe(exec, "if [ -e /usr/bin/getfacl ] && [ -e /usr/bin/setfacl ] ; then echo exists ; fi")
    {
        best_effort(format!(
            "getfacl --absolute-names -- {old} | setfacl --set-file=- -- {new}"
        ));
    }
    best_effort(format!("cp --attributes-only --preserve=xattr -- {old} {new}"));
    if probe(exec, "if [ -e /usr/sbin/getenforce ] ; then echo exists ; fi") {
        let enforcing = exec
            .run_unchecked("getenforce")
            .map(|r| r.stdout.trim() != "Disabled")
            .unwrap_or(false);
        if enforcing && probe(exec, "if [ -e /usr/bin/chcon ] ; then echo exists ; fi") {
            best_effort(format!("chcon --reference={old} -- {new}"));
        }
    }
}

fn probe(exec: &dyn Executor, command: &str) -> bool {
    exec.run_unchecked(command)
        .map(|r| r.stdout.trim() == "exists")
        .unwrap_or(false)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::MockExecutor;

    #[test]
    fn new_file_skips_metadata_and_renames() {
        let exec = MockExecutor::new("web1")
            .with_response(true, "") // exists probe: absent
            .with_response(true, ""); // mv
        atomic_write_remote(&exec, Path::new("/etc/motd"), "hello\n").unwrap();
        let commands = exec.commands();
        assert_eq!(commands.len(), 2, "probe + rename only: {commands:?}");
        assert!(commands[0].contains("if [ -e /etc/motd ]"));
        assert!(commands[1].starts_with("mv -f -- /etc/motd.tmp."));
        assert!(commands[1].ends_with(".tmp /etc/motd"));
        // Content was uploaded to the sibling temp path before the rename.
        let uploaded = commands[1]
            .strip_prefix("mv -f -- ")
            .and_then(|s| s.strip_suffix(" /etc/motd"))
            .unwrap();
        assert_eq!(exec.file(uploaded).unwrap(), "hello\n");
    }

    #[test]
    fn existing_file_copies_metadata_before_rename() {
        let exec = MockExecutor::new("web1")
            .with_response(true, "exists") // exists probe
            .with_response(true, "") // regular-file probe
            .with_response(true, "1") // stat %h
            .with_response(true, "") // chown
            .with_response(true, "") // chmod
            .with_response(true, "") // getfacl/setfacl probe: absent
            .with_response(true, "") // cp --attributes-only
            .with_response(true, "") // getenforce probe: absent
            .with_response(true, ""); // mv
        atomic_write_remote(&exec, Path::new("/etc/motd"), "hello\n").unwrap();
        let commands = exec.commands();
        assert!(
            commands.iter().any(|c| c.starts_with("chown --reference=")),
            "owner must be copied: {commands:?}"
        );
        let mv_index = commands.iter().position(|c| c.starts_with("mv -f")).unwrap();
        assert_eq!(
            mv_index,
            commands.len() - 1,
            "rename must be the final step: {commands:?}"
        );
    }

    #[test]
    fn relative_path_is_rejected() {
        let exec = MockExecutor::new("web1");
        let err = atomic_write_remote(&exec, Path::new("etc/motd"), "x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "remote filename must be absolute, 'etc/motd' given"
        );
        assert!(exec.commands().is_empty(), "no command may run before validation");
    }

    #[test]
    fn symlink_destination_is_rejected() {
        let exec = MockExecutor::new("web1")
            .with_response(true, "exists")
            .with_response(true, "notregular");
        let err = atomic_write_remote(&exec, Path::new("/etc/motd"), "x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "remote filename must be regular file, '/etc/motd' given"
        );
    }

    #[test]
    fn hardlinked_destination_is_rejected() {
        let exec = MockExecutor::new("web1")
            .with_response(true, "exists")
            .with_response(true, "")
            .with_response(true, "2");
        let err = atomic_write_remote(&exec, Path::new("/etc/motd"), "x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "file '/etc/motd' has 2 hardlinks, it can't be atomically written"
        );
    }

    #[test]
    fn garbled_stat_output_is_rejected() {
        let exec = MockExecutor::new("web1")
            .with_response(true, "exists")
            .with_response(true, "")
            .with_response(true, "not-a-number");
        let err = atomic_write_remote(&exec, Path::new("/etc/motd"), "x").unwrap_err();
        assert!(
            err.to_string().contains("unexpected output"),
            "garbled stat output should be fatal, got: {err}"
        );
    }
}
