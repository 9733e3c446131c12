//! Line-oriented editor primitives.
//!
//! Each constructor validates its arguments up front (patterns must
//! compile, anchors must be well-formed) so that a mis-specified editor
//! fails before any file is touched. Application is a pure
//! text-to-text transformation; the idempotence of every primitive is
//! what makes the double-apply pipeline check in [`crate::editor`] hold.

use regex::Regex;

use crate::error::EditorError;

/// Where to insert a line relative to its anchor.
#[derive(Debug, Clone)]
pub enum Anchor {
    /// Insert immediately before the line matching the pattern.
    Before(String),
    /// Insert immediately after the line matching the pattern.
    After(String),
}

/// Wrap a pattern with `^`/`$` so it must match a whole line.
pub(crate) fn full_line(pattern: &str) -> String {
    let mut anchored = String::with_capacity(pattern.len() + 2);
    if !pattern.starts_with('^') {
        anchored.push('^');
    }
    anchored.push_str(pattern);
    if !pattern.ends_with('$') {
        anchored.push('$');
    }
    anchored
}

pub(crate) fn compile(pattern: &str) -> Result<Regex, EditorError> {
    Regex::new(pattern).map_err(|source| EditorError::BadPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Insert `line` before or after the unique line matching the anchor.
///
/// The anchor must match exactly one line; if `line` is already present
/// verbatim anywhere in the text the insert is a no-op.
pub(crate) fn insert_line(
    text: &str,
    line: &str,
    anchor: &Regex,
    before: bool,
) -> Result<String, EditorError> {
    let lines: Vec<&str> = text.split('\n').collect();
    let anchor_count = lines.iter().filter(|l| anchor.is_match(l)).count();
    if anchor_count == 0 {
        return Err(EditorError::AnchorNotFound {
            pattern: anchor.as_str().to_string(),
        });
    }
    if anchor_count > 1 {
        return Err(EditorError::AnchorAmbiguous {
            pattern: anchor.as_str().to_string(),
            count: anchor_count,
        });
    }
    if lines.iter().any(|l| *l == line) {
        return Ok(text.to_string());
    }
    let mut out = Vec::with_capacity(lines.len() + 1);
    for current in lines {
        if anchor.is_match(current) {
            if before {
                out.push(line);
                out.push(current);
            } else {
                out.push(current);
                out.push(line);
            }
        } else {
            out.push(current);
        }
    }
    Ok(out.join("\n"))
}

/// Prepend `line` before the first line, unless already present anywhere.
pub(crate) fn prepend_line(text: &str, line: &str, blank_after: bool) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.iter().any(|l| *l == line) {
        return text.to_string();
    }
    if blank_after {
        lines.insert(0, "");
    }
    lines.insert(0, line);
    lines.join("\n")
}

/// Append `line` after the last line, unless already present anywhere.
///
/// The result always ends with a trailing newline.
pub(crate) fn append_line(text: &str, line: &str, blank_before: bool) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.iter().any(|l| *l == line) {
        return text.to_string();
    }
    if lines.last() == Some(&"") {
        if blank_before {
            lines.push(line);
        } else {
            lines.pop();
            lines.push(line);
        }
    } else {
        if blank_before {
            lines.push("");
        }
        lines.push(line);
    }
    lines.push("");
    lines.join("\n")
}

/// Drop every line fully matching the pattern.
pub(crate) fn delete_line(text: &str, pattern: &Regex) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .filter(|l| !pattern.is_match(l))
        .collect();
    lines.join("\n")
}

/// Substitute the pattern on every fully matching line.
///
/// Lines that do not match in full are left untouched. The replacement
/// supports `$n` capture-group references.
pub(crate) fn replace_line(text: &str, pattern: &Regex, replacement: &str) -> String {
    let lines: Vec<String> = text
        .split('\n')
        .map(|l| {
            if pattern.is_match(l) {
                pattern.replace(l, replacement).into_owned()
            } else {
                l.to_string()
            }
        })
        .collect();
    lines.join("\n")
}

/// Substitute every occurrence of the pattern within matching lines.
///
/// Unlike [`replace_line`] the pattern is not anchored, so partial
/// matches inside a line are rewritten.
pub(crate) fn substitute_line(text: &str, pattern: &Regex, replacement: &str) -> String {
    let lines: Vec<String> = text
        .split('\n')
        .map(|l| {
            if pattern.is_match(l) {
                pattern.replace_all(l, replacement).into_owned()
            } else {
                l.to_string()
            }
        })
        .collect();
    lines.join("\n")
}

/// Strip a character set (default whitespace) from both ends of every line.
pub(crate) fn strip_line(text: &str, chars: Option<&str>) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| match chars {
            None => l.trim(),
            Some(set) => l.trim_matches(|c| set.contains(c)),
        })
        .collect();
    lines.join("\n")
}
