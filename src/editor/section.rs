//! INI section splitting and scoped editing.
//!
//! Splits a document into a preamble (the unnamed section before the
//! first header) plus named `[section]` blocks, applies an editor
//! pipeline to exactly one section's body, and reassembles the document
//! preserving section order and every untouched section verbatim.

use std::sync::LazyLock;

use regex::Regex;

use crate::editor::{Editor, apply_editors};
use crate::error::EditorError;

#[allow(clippy::expect_used)]
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[(.*)\]\s*$").expect("header pattern compiles"));

/// One section of an INI-structured document.
///
/// `name` is `None` for the preamble before the first header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: Option<String>,
    lines: Vec<String>,
}

/// Validate a `[name]` argument, returning the bare name.
pub(crate) fn section_name(raw: &str) -> Result<String, EditorError> {
    let inner = raw
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| EditorError::BadSectionName {
            name: raw.to_string(),
        })?;
    Ok(inner.to_string())
}

/// Split `text` into ordered sections, rejecting duplicate names.
fn split_sections(text: &str) -> Result<Vec<Section>, EditorError> {
    let mut sections = vec![Section {
        name: None,
        lines: Vec::new(),
    }];
    for line in text.split('\n') {
        if let Some(captures) = HEADER_RE.captures(line) {
            let name = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            if sections
                .iter()
                .any(|s| s.name.as_deref() == Some(name.as_str()))
            {
                return Err(EditorError::DuplicateSection { name });
            }
            sections.push(Section {
                name: Some(name),
                lines: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.lines.push(line.to_string());
        }
    }
    Ok(sections)
}

/// Reassemble sections into a document, re-emitting `[name]` headers.
fn join_sections(sections: &[Section]) -> String {
    let mut out: Vec<String> = Vec::new();
    for section in sections {
        if let Some(name) = &section.name {
            out.push(format!("[{name}]"));
        }
        out.extend(section.lines.iter().cloned());
    }
    out.join("\n")
}

/// Apply `editors` to the body of the named section only.
///
/// `target` is `None` for the preamble. The target section must exist;
/// duplicate section names anywhere in the source are fatal. Untouched
/// sections round-trip verbatim and section order is preserved.
pub(crate) fn edit_section(
    text: &str,
    target: Option<&str>,
    editors: &[Editor],
) -> Result<String, EditorError> {
    let mut sections = split_sections(text)?;
    let section = sections
        .iter_mut()
        .find(|s| s.name.as_deref() == target)
        .ok_or_else(|| EditorError::SectionNotFound {
            name: target.unwrap_or_default().to_string(),
        })?;
    let body = section.lines.join("\n");
    let outcome = apply_editors(&body, editors)?;
    if outcome.changed {
        section.lines = outcome.text.split('\n').map(str::to_string).collect();
    }
    Ok(join_sections(&sections))
}
