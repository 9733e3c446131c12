//! Idempotent text-editing pipeline.
//!
//! An [`Editor`] is a pure text-to-text transformation. Editors compose:
//! applying an ordered list to a document is the pipeline, and the
//! pipeline enforces idempotence by construction — the whole sequence is
//! applied twice and any disagreement between the passes aborts the run.
//! Idempotence is what lets provisioning scripts run repeatedly against
//! the same host without churning files.
//!
//! Editors target whole documents, a single named `[section]` of an
//! INI-structured document, or files — local directly, remote through an
//! [`Executor`](crate::exec::Executor).

mod line;
mod section;
mod text;

use std::path::Path;

use regex::Regex;
use tracing::debug;

pub use line::Anchor;
pub use text::strip_text;

use crate::error::{EditorError, FileError};
use crate::exec::Executor;
use crate::fileio;

/// A single text transformation, usable standalone or in a pipeline.
///
/// Constructed through the associated functions, which validate
/// arguments up front: patterns must compile, section names must be of
/// the form `[name]`. Application never mutates in place; it returns the
/// transformed text.
#[derive(Debug, Clone)]
pub struct Editor {
    kind: Kind,
}

#[derive(Debug, Clone)]
enum Kind {
    InsertLine {
        line: String,
        anchor: Regex,
        before: bool,
    },
    PrependLine {
        line: String,
        blank_after: bool,
    },
    AppendLine {
        line: String,
        blank_before: bool,
    },
    DeleteLine {
        pattern: Regex,
    },
    ReplaceLine {
        pattern: Regex,
        replacement: String,
    },
    SubstituteLine {
        pattern: Regex,
        replacement: String,
    },
    StripLine {
        chars: Option<String>,
    },
    IniSection {
        name: Option<String>,
        editors: Vec<Editor>,
    },
}

impl Editor {
    /// Insert `line` before or after the unique line matching the anchor
    /// pattern.
    ///
    /// The anchor is whole-line anchored (wrapped with `^`/`$` when not
    /// already). At apply time it must match exactly one line; if `line`
    /// is already present verbatim anywhere, the editor is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::BadPattern`] if the anchor does not compile.
    pub fn insert_line(line: impl Into<String>, anchor: Anchor) -> Result<Self, EditorError> {
        let (pattern, before) = match &anchor {
            Anchor::Before(p) => (p, true),
            Anchor::After(p) => (p, false),
        };
        let anchor = line::compile(&line::full_line(pattern))?;
        Ok(Self {
            kind: Kind::InsertLine {
                line: line.into(),
                anchor,
                before,
            },
        })
    }

    /// Prepend `line` before the first line.
    ///
    /// No-op if `line` already exists anywhere in the text. When
    /// `blank_after` is set an empty separator line follows the insert.
    #[must_use]
    pub fn prepend_line(line: impl Into<String>, blank_after: bool) -> Self {
        Self {
            kind: Kind::PrependLine {
                line: line.into(),
                blank_after,
            },
        }
    }

    /// Append `line` after the last line.
    ///
    /// No-op if `line` already exists anywhere in the text. When
    /// `blank_before` is set an empty separator line precedes the
    /// append. The result always ends with a trailing newline.
    #[must_use]
    pub fn append_line(line: impl Into<String>, blank_before: bool) -> Self {
        Self {
            kind: Kind::AppendLine {
                line: line.into(),
                blank_before,
            },
        }
    }

    /// Delete every line fully matching `pattern`.
    ///
    /// The pattern is whole-line anchored.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::BadPattern`] if the pattern does not compile.
    pub fn delete_line(pattern: &str) -> Result<Self, EditorError> {
        Ok(Self {
            kind: Kind::DeleteLine {
                pattern: line::compile(&line::full_line(pattern))?,
            },
        })
    }

    /// Replace every line fully matching `pattern` with `replacement`.
    ///
    /// The pattern is whole-line anchored; lines matching only in part
    /// are left alone (see [`Editor::substitute_line`] for partial
    /// matches). The replacement supports `$n` capture-group references,
    /// and inline flags such as `(?i)` may be embedded in the pattern.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::BadPattern`] if the pattern does not compile.
    pub fn replace_line(pattern: &str, replacement: &str) -> Result<Self, EditorError> {
        Ok(Self {
            kind: Kind::ReplaceLine {
                pattern: line::compile(&line::full_line(pattern))?,
                replacement: replacement.to_string(),
            },
        })
    }

    /// Substitute every occurrence of `pattern` inside matching lines.
    ///
    /// The pattern is *not* anchored: any line containing a match is
    /// rewritten, other lines are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::BadPattern`] if the pattern does not compile.
    pub fn substitute_line(pattern: &str, replacement: &str) -> Result<Self, EditorError> {
        Ok(Self {
            kind: Kind::SubstituteLine {
                pattern: line::compile(pattern)?,
                replacement: replacement.to_string(),
            },
        })
    }

    /// Strip a character set from both ends of every line.
    ///
    /// `chars` lists the characters to remove; `None` strips whitespace.
    #[must_use]
    pub fn strip_line(chars: Option<&str>) -> Self {
        Self {
            kind: Kind::StripLine {
                chars: chars.map(str::to_string),
            },
        }
    }

    /// Apply `editors` to one named section of an INI-structured document.
    ///
    /// `name` must be of the form `[section_name]`, or `None` to target
    /// the preamble before the first header. Duplicate section names in
    /// the document are fatal, as is a missing target section. Untouched
    /// sections round-trip verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::BadSectionName`] for a malformed `name`.
    pub fn ini_section(name: Option<&str>, editors: Vec<Self>) -> Result<Self, EditorError> {
        let name = name.map(section::section_name).transpose()?;
        Ok(Self {
            kind: Kind::IniSection { name, editors },
        })
    }

    /// Apply this editor to `text`, returning the transformed text.
    ///
    /// # Errors
    ///
    /// Returns an error for unmatched or ambiguous insert anchors and for
    /// section-structure violations.
    pub fn apply(&self, text: &str) -> Result<String, EditorError> {
        match &self.kind {
            Kind::InsertLine {
                line,
                anchor,
                before,
            } => line::insert_line(text, line, anchor, *before),
            Kind::PrependLine { line, blank_after } => {
                Ok(line::prepend_line(text, line, *blank_after))
            }
            Kind::AppendLine { line, blank_before } => {
                Ok(line::append_line(text, line, *blank_before))
            }
            Kind::DeleteLine { pattern } => Ok(line::delete_line(text, pattern)),
            Kind::ReplaceLine {
                pattern,
                replacement,
            } => Ok(line::replace_line(text, pattern, replacement)),
            Kind::SubstituteLine {
                pattern,
                replacement,
            } => Ok(line::substitute_line(text, pattern, replacement)),
            Kind::StripLine { chars } => Ok(line::strip_line(text, chars.as_deref())),
            Kind::IniSection { name, editors } => {
                section::edit_section(text, name.as_deref(), editors)
            }
        }
    }
}

/// Result of applying an editor pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Whether the final text differs from the input.
    pub changed: bool,
    /// The text after the pipeline.
    pub text: String,
}

/// Apply an ordered editor pipeline to `text`.
///
/// The sequence is applied twice; if the two passes disagree the
/// pipeline is rejected as non-idempotent. This is a defensive check for
/// editor-authoring bugs and is always fatal.
///
/// # Errors
///
/// Returns [`EditorError::EmptyPipeline`] for an empty `editors` list,
/// [`EditorError::NotIdempotent`] when the passes disagree, and any
/// error raised by an individual editor.
pub fn apply_editors(text: &str, editors: &[Editor]) -> Result<EditOutcome, EditorError> {
    if editors.is_empty() {
        return Err(EditorError::EmptyPipeline);
    }
    let mut first = text.to_string();
    for editor in editors {
        first = editor.apply(&first)?;
    }
    let mut second = first.clone();
    for editor in editors {
        second = editor.apply(&second)?;
    }
    if first != second {
        return Err(EditorError::NotIdempotent);
    }
    let changed = second != text;
    debug!(changed, editors = editors.len(), "applied editor pipeline");
    Ok(EditOutcome {
        changed,
        text: second,
    })
}

/// Apply an editor pipeline to `text`, returning only the new text.
///
/// # Errors
///
/// Propagates every error from [`apply_editors`].
pub fn edit_text(text: &str, editors: &[Editor]) -> Result<String, EditorError> {
    Ok(apply_editors(text, editors)?.text)
}

/// Edit a local file in place through the atomic writer.
///
/// Reads the file, applies the pipeline, and rewrites the file
/// atomically only when the content changed. Returns whether a write
/// happened.
///
/// # Errors
///
/// Returns a [`FileError`] for read/write failures and wraps pipeline
/// errors with the file path as context.
pub fn edit_local_file(path: &Path, editors: &[Editor]) -> Result<bool, FileError> {
    let old_text = fileio::read_local_file(path)?;
    let outcome = apply_editors(&old_text, editors).map_err(|source| FileError::Edit {
        path: path.to_path_buf(),
        source,
    })?;
    if outcome.changed {
        fileio::atomic_write_local(path, &outcome.text)?;
    }
    Ok(outcome.changed)
}

/// Edit a file on a target host through its [`Executor`].
///
/// Remote analogue of [`edit_local_file`]: download, apply, and rewrite
/// atomically only when changed. Returns whether a write happened.
///
/// # Errors
///
/// Returns a [`FileError`] for transfer failures and wraps pipeline
/// errors with the file path as context.
pub fn edit_file(
    exec: &dyn Executor,
    path: &Path,
    editors: &[Editor],
) -> Result<bool, FileError> {
    let old_text = fileio::read_file(exec, path)?;
    let outcome = apply_editors(&old_text, editors).map_err(|source| FileError::Edit {
        path: path.to_path_buf(),
        source,
    })?;
    if outcome.changed {
        fileio::atomic_write_remote(exec, path, &outcome.text)?;
    }
    Ok(outcome.changed)
}
