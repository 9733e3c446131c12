//! Command execution abstraction for target hosts.
//!
//! Provides the [`Executor`] trait so that file operations can be driven
//! against any transport. Production code on the control machine uses
//! [`LocalExecutor`]; tests use the scripted mock in [`test_helpers`].
//! SSH transports are external collaborators and implement the same trait
//! out of tree.

use std::path::Path;
use std::process::{Command, Output};

use crate::error::ExecError;

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the command exited with status zero.
    pub success: bool,
    /// Raw exit code, if the process exited normally.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over shell execution and file transfer on a target.
///
/// This is the consumed interface of the remote-execution collaborator:
/// everything the toolkit needs from a transport is a shell, an upload,
/// and a download. Implementations are expected to apply their own
/// timeout and retry policy; the core never retries.
pub trait Executor: Send + Sync {
    /// Identifier of the target (hostname or IP), used in error messages.
    fn host(&self) -> &str;

    /// Run a shell command, failing if it exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Spawn`] if the command cannot be started and
    /// [`ExecError::Failed`] on a non-zero exit.
    fn run(&self, command: &str) -> Result<ExecResult, ExecError>;

    /// Run a shell command, tolerating failure.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Spawn`] only if the command cannot be started;
    /// a non-zero exit is reported through [`ExecResult::success`].
    fn run_unchecked(&self, command: &str) -> Result<ExecResult, ExecError>;

    /// Fetch the content of a file on the target.
    ///
    /// Returns `Ok(None)` when the file does not exist, so callers can
    /// implement create-if-missing logic.
    ///
    /// # Errors
    ///
    /// Returns an error when the transfer itself fails.
    fn download(&self, path: &Path) -> Result<Option<String>, ExecError>;

    /// Write `content` to a file on the target, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the transfer fails.
    fn upload(&self, path: &Path, content: &str) -> Result<(), ExecError>;
}

/// [`Executor`] implementation for the control machine itself.
///
/// Commands run through `sh -c`; transfers are plain filesystem reads and
/// writes. Useful for provisioning `localhost` and as the reference
/// implementation of the trait contract.
#[derive(Debug, Default)]
pub struct LocalExecutor;

impl LocalExecutor {
    /// Create a new local executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn shell(command: &str) -> Result<ExecResult, ExecError> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|source| ExecError::Spawn {
                command: command.to_string(),
                source,
            })?;
        Ok(ExecResult::from(output))
    }
}

impl Executor for LocalExecutor {
    fn host(&self) -> &str {
        "localhost"
    }

    fn run(&self, command: &str) -> Result<ExecResult, ExecError> {
        let result = Self::shell(command)?;
        if result.success {
            Ok(result)
        } else {
            Err(ExecError::Failed {
                command: command.to_string(),
                host: self.host().to_string(),
                code: result.code.unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
            })
        }
    }

    fn run_unchecked(&self, command: &str) -> Result<ExecResult, ExecError> {
        Self::shell(command)
    }

    fn download(&self, path: &Path) -> Result<Option<String>, ExecError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ExecError::Spawn {
                command: format!("read {}", path.display()),
                source,
            }),
        }
    }

    fn upload(&self, path: &Path, content: &str) -> Result<(), ExecError> {
        std::fs::write(path, content).map_err(|source| ExecError::Spawn {
            command: format!("write {}", path.display()),
            source,
        })
    }
}

/// Shared test helpers for executor-driven unit tests.
///
/// Provides a configurable [`MockExecutor`] so individual test modules do
/// not have to duplicate the scripting boilerplate.
#[cfg(test)]
pub mod test_helpers {
    use std::collections::{HashMap, VecDeque};
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::{ExecResult, Executor};
    use crate::error::ExecError;

    /// A scripted mock executor.
    ///
    /// Maintains a FIFO queue of `(success, stdout)` responses consumed by
    /// `run`/`run_unchecked` in call order. When the queue is empty any
    /// call returns a failed response with stdout `"unexpected call"`.
    /// Downloads are served from a pre-seeded path→content map; uploads
    /// are recorded into the same map. Every command line is recorded for
    /// sequence assertions.
    #[derive(Debug, Default)]
    pub struct MockExecutor {
        host: String,
        responses: Mutex<VecDeque<(bool, String)>>,
        files: Mutex<HashMap<PathBuf, String>>,
        commands: Mutex<Vec<String>>,
    }

    impl MockExecutor {
        /// Create a mock for the given host with no scripted responses.
        #[must_use]
        pub fn new(host: &str) -> Self {
            Self {
                host: host.to_string(),
                ..Self::default()
            }
        }

        /// Append a scripted `(success, stdout)` response.
        #[must_use]
        pub fn with_response(self, success: bool, stdout: &str) -> Self {
            if let Ok(mut responses) = self.responses.lock() {
                responses.push_back((success, stdout.to_string()));
            }
            self
        }

        /// Seed a file that `download` will serve.
        #[must_use]
        pub fn with_file(self, path: &str, content: &str) -> Self {
            if let Ok(mut files) = self.files.lock() {
                files.insert(PathBuf::from(path), content.to_string());
            }
            self
        }

        /// All command lines issued so far, in order.
        pub fn commands(&self) -> Vec<String> {
            self.commands
                .lock()
                .map_or_else(|_| Vec::new(), |commands| commands.clone())
        }

        /// Current content of a mock file, if any.
        pub fn file(&self, path: &str) -> Option<String> {
            self.files
                .lock()
                .ok()
                .and_then(|files| files.get(Path::new(path)).cloned())
        }

        fn next(&self, command: &str) -> (bool, String) {
            if let Ok(mut commands) = self.commands.lock() {
                commands.push(command.to_string());
            }
            self.responses.lock().map_or_else(
                |_| (false, "mutex poisoned".to_string()),
                |mut responses| {
                    responses
                        .pop_front()
                        .unwrap_or_else(|| (false, "unexpected call".to_string()))
                },
            )
        }
    }

    impl Executor for MockExecutor {
        fn host(&self) -> &str {
            &self.host
        }

        fn run(&self, command: &str) -> Result<ExecResult, ExecError> {
            let (success, stdout) = self.next(command);
            if success {
                Ok(ExecResult {
                    stdout,
                    stderr: String::new(),
                    success: true,
                    code: Some(0),
                })
            } else {
                Err(ExecError::Failed {
                    command: command.to_string(),
                    host: self.host.clone(),
                    code: 1,
                    stderr: stdout,
                })
            }
        }

        fn run_unchecked(&self, command: &str) -> Result<ExecResult, ExecError> {
            let (success, stdout) = self.next(command);
            Ok(ExecResult {
                stdout,
                stderr: String::new(),
                success,
                code: Some(i32::from(!success)),
            })
        }

        fn download(&self, path: &Path) -> Result<Option<String>, ExecError> {
            Ok(self
                .files
                .lock()
                .ok()
                .and_then(|files| files.get(path).cloned()))
        }

        fn upload(&self, path: &Path, content: &str) -> Result<(), ExecError> {
            if let Ok(mut files) = self.files.lock() {
                files.insert(path.to_path_buf(), content.to_string());
            }
            Ok(())
        }
    }
}
