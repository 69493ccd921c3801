//! Tab-based indentation helpers.
//!
//! Generated code is built with one tab per indentation level and expanded
//! to spaces once the whole file has been assembled.

use crate::NameError;

/// Number of spaces a tab expands to.
pub const INDENT_WIDTH: usize = 4;

/// Count the leading tab characters of a line.
pub fn count_indent_level(line: &str) -> usize {
    line.chars().take_while(|c| *c == '\t').count()
}

/// Prepend `level` tabs to a line.
pub fn indent_line(line: &str, level: i32) -> Result<String, NameError> {
    let level = usize::try_from(level).map_err(|_| NameError::NegativeIndent(level))?;
    Ok(format!("{}{}", "\t".repeat(level), line))
}

/// Indent every line of `text` by `level` tabs.
///
/// Empty input counts as a single empty line. The result always ends with
/// exactly one newline.
pub fn indent_block(text: &str, level: usize) -> String {
    let prefix = "\t".repeat(level);
    if text.is_empty() {
        return format!("{prefix}\n");
    }

    let mut out = String::with_capacity(text.len() + level * 8);
    for line in text.lines() {
        out.push_str(&prefix);
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Strip the common leading whitespace from every line.
///
/// The margin is the shortest leading-whitespace run among non-blank lines;
/// tabs and spaces count one character each. Whitespace-only lines become
/// empty.
pub fn unindent(text: &str) -> String {
    let margin = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.trim().is_empty() {
            continue;
        }
        let start = line
            .char_indices()
            .nth(margin)
            .map_or(line.len(), |(idx, _)| idx);
        out.push_str(&line[start..]);
    }
    out
}

/// Expand every tab to [`INDENT_WIDTH`] spaces.
pub fn replace_tabs_with_spaces(text: &str) -> String {
    text.replace('\t', &" ".repeat(INDENT_WIDTH))
}
