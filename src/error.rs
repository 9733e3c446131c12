//! Domain-specific error types for the provisioning toolkit.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`InventoryError`],
//! [`EditorError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! Every fatal condition enumerated by the inventory resolver, the editor
//! pipeline, and the atomic file writer has a dedicated variant whose
//! `Display` output is the exact user-facing message. The message text is a
//! contract: tests assert on it, and provisioning scripts grep for it.
//!
//! # Error hierarchy
//!
//! ```text
//! ProvisionError
//! ├── Inventory(InventoryError) — inventory schema and reference validation
//! ├── Edit(EditorError)         — editor construction, anchors, idempotence
//! ├── File(FileError)           — reads, atomic replacement, transfers
//! ├── Exec(ExecError)           — command execution on a target
//! └── Render(RenderError)       — template lookup and expansion
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the provisioning toolkit.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Inventory validation error (schema, references, duplicates).
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Editor pipeline error (bad arguments, anchors, idempotence).
    #[error("edit error: {0}")]
    Edit(#[from] EditorError),

    /// File I/O error (reads, atomic replacement, transfers).
    #[error("file error: {0}")]
    File(#[from] FileError),

    /// Command execution error on a target host.
    #[error("exec error: {0}")]
    Exec(#[from] ExecError),

    /// Template rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Errors raised while validating and resolving an inventory document.
///
/// Validation is all-or-nothing: the first violation aborts the parse and
/// no partial inventory is ever produced.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The top-level YAML node is not a mapping.
    #[error("config must be dictionary type")]
    NotAMapping,

    /// Both `hosts` and `roles` are present.
    #[error("hosts and roles can't be simultaneously defined in config")]
    HostsAndRoles,

    /// Neither `hosts` nor `roles` is present.
    #[error("hosts or roles must be defined in config")]
    HostsOrRolesRequired,

    /// A key that must hold a list holds something else.
    #[error("{key} must be list type")]
    ListExpected {
        /// The offending key (e.g. `hosts`, `roles`, `host_vars`).
        key: &'static str,
    },

    /// A list that must not be empty is empty.
    #[error("{key} must not be empty")]
    EmptyList {
        /// The offending key.
        key: &'static str,
    },

    /// A key that must hold a mapping holds something else.
    #[error("{key} must be dictionary type")]
    MappingExpected {
        /// The offending key (e.g. `defaults`, `host_vars vars`).
        key: String,
    },

    /// A required field is absent from a list entry.
    #[error("{key} {field} required")]
    FieldRequired {
        /// The list the entry belongs to.
        key: &'static str,
        /// The missing field name.
        field: &'static str,
    },

    /// A value that must be a string has another type.
    #[error("{what} must be string type")]
    StringExpected {
        /// Description of the offending value.
        what: String,
    },

    /// A list that must contain only strings contains something else.
    #[error("{what} must be list of strings")]
    StringListExpected {
        /// Description of the offending list.
        what: String,
    },

    /// A string that must be non-empty is empty or null.
    #[error("{what} can't be empty string")]
    EmptyString {
        /// Description of the offending value.
        what: String,
    },

    /// A host appears twice in the `hosts` list.
    #[error("host '{host}' already defined in hosts list")]
    DuplicateHost {
        /// The duplicated host.
        host: String,
    },

    /// A host appears twice within one role's host list.
    #[error("host '{host}' already defined in role '{role}' hosts list")]
    DuplicateRoleHost {
        /// The duplicated host.
        host: String,
        /// The role whose host list contains the duplicate.
        role: String,
    },

    /// A role name appears twice in the `roles` list.
    #[error("role '{role}' already defined")]
    DuplicateRole {
        /// The duplicated role.
        role: String,
    },

    /// A `host_vars` entry references a host missing from `hosts`.
    #[error("host_vars host '{host}' not defined in hosts list")]
    UnknownHost {
        /// The unknown host.
        host: String,
    },

    /// A `host_vars` entry references a host missing from every role.
    #[error("host_vars host '{host}' not defined in roles hosts list")]
    UnknownRoleHost {
        /// The unknown host.
        host: String,
    },

    /// A `role_vars` entry references an undeclared role.
    #[error("role_vars role '{role}' not defined in roles")]
    UnknownRole {
        /// The unknown role.
        role: String,
    },

    /// `role_vars` is present but `roles` is not.
    #[error("unexpected role_vars, because roles is not defined")]
    RoleVarsWithoutRoles,

    /// Two `host_vars` entries target the same host.
    #[error("host_vars host '{host}' already defined")]
    DuplicateHostVars {
        /// The duplicated host.
        host: String,
    },

    /// Two `role_vars` entries target the same role.
    #[error("role_vars role '{role}' already defined")]
    DuplicateRoleVars {
        /// The duplicated role.
        role: String,
    },

    /// A list entry carries fields beyond the recognized set.
    #[error("unexpected {key} entry: {fields}")]
    UnexpectedEntryFields {
        /// The list the entry belongs to.
        key: &'static str,
        /// Comma-separated unknown field names.
        fields: String,
    },

    /// The document carries top-level keys beyond the recognized set.
    #[error("unexpected config entry: {keys}")]
    UnexpectedKeys {
        /// Comma-separated unknown key names.
        keys: String,
    },

    /// A host was selected that the inventory does not declare.
    #[error("host '{host}' not defined in inventory")]
    NoSuchHost {
        /// The unknown host.
        host: String,
    },

    /// The document is not syntactically valid YAML.
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The named inventory file does not exist.
    #[error("config '{}' not exists", path.display())]
    Missing {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The inventory file could not be read.
    #[error("reading '{}' failed: {source}", path.display())]
    Read {
        /// Path to the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised by editor construction and the editor pipeline.
#[derive(Error, Debug)]
pub enum EditorError {
    /// A pattern argument failed to compile as a regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    BadPattern {
        /// The pattern as given.
        pattern: String,
        /// Underlying regex compile error.
        source: regex::Error,
    },

    /// An insert anchor matched no line.
    #[error("insert_line: anchor pattern '{pattern}' not found")]
    AnchorNotFound {
        /// The (whole-line-anchored) anchor pattern.
        pattern: String,
    },

    /// An insert anchor matched more than one line.
    #[error("insert_line: anchor pattern '{pattern}' found {count} times, must be only one")]
    AnchorAmbiguous {
        /// The (whole-line-anchored) anchor pattern.
        pattern: String,
        /// How many lines matched.
        count: usize,
    },

    /// The pipeline was invoked with no editors.
    #[error("editors can't be empty")]
    EmptyPipeline,

    /// Two consecutive pipeline passes disagreed.
    ///
    /// This signals an editor-authoring bug, never a runtime condition.
    #[error("editors are not idempotent")]
    NotIdempotent,

    /// A section name is not of the form `[name]`.
    #[error("edit_ini_section: section name must be in form [section_name], '{name}' given")]
    BadSectionName {
        /// The malformed section name as given.
        name: String,
    },

    /// The source text declares the same section twice.
    #[error("edit_ini_section: bad ini file, section '[{name}]' duplicated")]
    DuplicateSection {
        /// The duplicated section name (without brackets).
        name: String,
    },

    /// The target section is absent from the source text.
    #[error("edit_ini_section: section '[{name}]' not found")]
    SectionNotFound {
        /// The target section name (without brackets).
        name: String,
    },
}

/// Errors raised by file reads, atomic replacement, and transfers.
#[derive(Error, Debug)]
pub enum FileError {
    /// A path that must be absolute is relative.
    #[error("{kind} filename must be absolute, '{}' given", path.display())]
    NotAbsolute {
        /// `"local"` or `"remote"`.
        kind: &'static str,
        /// The offending path.
        path: PathBuf,
    },

    /// The replacement target exists but is not a regular non-symlink file.
    #[error("{kind} filename must be regular file, '{}' given", path.display())]
    NotRegularFile {
        /// `"local"` or `"remote"`.
        kind: &'static str,
        /// The offending path.
        path: PathBuf,
    },

    /// The replacement target has more than one hard link.
    #[error("file '{}' has {count} hardlinks, it can't be atomically written", path.display())]
    HardLinks {
        /// The offending path.
        path: PathBuf,
        /// The observed link count.
        count: u64,
    },

    /// A local file could not be read.
    #[error("reading '{}' failed: {source}", path.display())]
    Read {
        /// Path to the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A local file could not be written.
    #[error("writing '{}' failed: {source}", path.display())]
    Write {
        /// Path to the unwritable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Downloading a remote file failed or the file is absent.
    #[error("downloading file '{}' from host '{host}' failed", path.display())]
    Download {
        /// Remote path.
        path: PathBuf,
        /// Target host.
        host: String,
    },

    /// Uploading a remote file failed.
    #[error("uploading file '{}' to host '{host}' failed", path.display())]
    Upload {
        /// Remote path.
        path: PathBuf,
        /// Target host.
        host: String,
    },

    /// A remote command required by the write protocol failed.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// The editor pipeline failed while editing a file.
    ///
    /// Carries the file path as explicit context so pipeline errors name
    /// the file being edited.
    #[error("editing '{}': {source}", path.display())]
    Edit {
        /// The file being edited.
        path: PathBuf,
        /// Underlying pipeline error.
        source: EditorError,
    },

    /// The conventional `files/` directory is absent.
    #[error("copy_file: files dir '{}' not exists", path.display())]
    FilesDirMissing {
        /// Expected directory path.
        path: PathBuf,
    },

    /// The named source file is absent from `files/`.
    #[error("copy_file: file '{}' not exists", path.display())]
    CopySourceMissing {
        /// Expected file path.
        path: PathBuf,
    },
}

/// Errors raised while executing commands on a target.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The command could not be spawned at all.
    #[error("failed to execute '{command}': {source}")]
    Spawn {
        /// The command line.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The command ran and exited non-zero.
    #[error("command '{command}' failed on host '{host}' (exit {code}): {stderr}")]
    Failed {
        /// The command line.
        command: String,
        /// Target host.
        host: String,
        /// Exit code (-1 when terminated by signal).
        code: i32,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The command produced output the caller cannot interpret.
    #[error("unexpected output from '{command}' on host '{host}': {output}")]
    UnexpectedOutput {
        /// The command line.
        command: String,
        /// Target host.
        host: String,
        /// The uninterpretable output.
        output: String,
    },
}

/// Errors raised by template rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The conventional `templates/` directory is absent.
    #[error("render_template: templates dir '{}' not exists", path.display())]
    TemplatesDirMissing {
        /// Expected directory path.
        path: PathBuf,
    },

    /// The named template is absent from `templates/`.
    #[error("render_template: template '{}' not exists", path.display())]
    TemplateMissing {
        /// Expected template path.
        path: PathBuf,
    },

    /// Template expansion failed (syntax error or undefined reference).
    #[error("rendering '{name}' failed: {source}")]
    Render {
        /// Template name (or `<string>` for literal sources).
        name: String,
        /// Underlying engine error.
        source: minijinja::Error,
    },
}

/// Errors raised while flattening package specifications.
#[derive(Error, Debug)]
pub enum PackageError {
    /// A package list leaf is neither a string nor a list.
    #[error("package spec must be string or list of strings, got {kind}")]
    InvalidLeaf {
        /// The YAML node type encountered.
        kind: &'static str,
    },

    /// A package name is empty.
    #[error("package name can't be empty string")]
    EmptyName,
}
