// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed provisioning project and a fluent
// builder so each integration test can set up an isolated environment
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use provkit::session::Project;

/// An isolated provisioning project backed by a [`tempfile::TempDir`].
///
/// The directory is removed when the value is dropped.
pub struct TestProject {
    dir: tempfile::TempDir,
}

impl TestProject {
    /// Create an empty project directory.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create project tempdir"),
        }
    }

    /// Absolute path of the project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// A [`Project`] rooted at this directory.
    pub fn project(&self) -> Project {
        Project::new(self.root())
    }

    /// Write the conventional `inventory.yaml`.
    pub fn with_inventory(self, text: &str) -> Self {
        std::fs::write(self.root().join("inventory.yaml"), text).expect("write inventory.yaml");
        self
    }

    /// Write a template under `templates/`.
    pub fn with_template(self, name: &str, content: &str) -> Self {
        let dir = self.root().join("templates");
        std::fs::create_dir_all(&dir).expect("create templates dir");
        std::fs::write(dir.join(name), content).expect("write template");
        self
    }

    /// Write a payload file under `files/`.
    pub fn with_file(self, name: &str, content: &str) -> Self {
        let dir = self.root().join("files");
        std::fs::create_dir_all(&dir).expect("create files dir");
        std::fs::write(dir.join(name), content).expect("write payload file");
        self
    }

    /// Write an arbitrary file under the root, returning its absolute path.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// Read a file under the root.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root().join(rel)).expect("read file")
    }
}
