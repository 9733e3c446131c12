//! Whole-text normalization helpers.

/// Normalize heredoc-style content before writing it to a file.
///
/// Strips leading and trailing blank lines, strips whitespace from both
/// ends of every remaining line, and guarantees the result ends in
/// exactly one trailing newline. Empty or absent input yields the empty
/// string.
///
/// # Examples
///
/// ```
/// use provkit::editor::strip_text;
///
/// assert_eq!(strip_text(Some("\n  a\n  b  \n\n")), "a\nb\n");
/// assert_eq!(strip_text(None), "");
/// ```
#[must_use]
pub fn strip_text(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    if text.is_empty() {
        return String::new();
    }
    let mut lines: Vec<&str> = text.trim().split('\n').map(str::trim).collect();
    lines.push("");
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_empty() {
        assert_eq!(strip_text(None), "");
    }

    #[test]
    fn empty_is_empty() {
        assert_eq!(strip_text(Some("")), "");
    }

    #[test]
    fn whitespace_only_collapses_to_single_newline() {
        assert_eq!(strip_text(Some("  \n \t \n")), "\n");
    }

    #[test]
    fn strips_blank_edges_and_per_line_whitespace() {
        assert_eq!(strip_text(Some("\n\n  a b \n\tc\n\n")), "a b\nc\n");
    }

    #[test]
    fn always_ends_with_exactly_one_newline() {
        assert_eq!(strip_text(Some("a")), "a\n");
        assert_eq!(strip_text(Some("a\n")), "a\n");
        assert_eq!(strip_text(Some("a\n\n\n")), "a\n");
    }

    #[test]
    fn interior_blank_lines_survive() {
        assert_eq!(strip_text(Some("a\n\nb\n")), "a\n\nb\n");
    }

    #[test]
    fn is_a_fixed_point() {
        let once = strip_text(Some(" x \n y \n"));
        assert_eq!(strip_text(Some(&once)), once);
    }
}
