//! Blank-line and whitespace normalization.

use litgen_codegen::{CodeFormatter, Result};

use crate::validator::continued_string_lines;

/// Normalizes vertical whitespace the way black lays out a module.
///
/// - trailing whitespace is removed and the file ends with one newline;
/// - top-level `class`/`def` statements (and their decorators and attached
///   comments) are preceded by two blank lines, nested ones by one;
/// - the first top-level statement after a class or function body is
///   preceded by two blank lines;
/// - blank lines are dropped at the start of the file, after a block opener
///   and after a decorator; other runs are capped (two at top level, one
///   inside blocks).
///
/// The formatter works line by line; lines that continue a multi-line
/// string literal are kept verbatim.
#[derive(Debug, Clone, Copy)]
pub struct LayoutFormatter {
    max_blank_lines: usize,
}

impl LayoutFormatter {
    pub fn new() -> Self {
        Self { max_blank_lines: 2 }
    }

    /// Cap for consecutive blank lines at top level.
    pub fn with_max_blank_lines(mut self, max: usize) -> Self {
        self.max_blank_lines = max;
        self
    }
}

impl Default for LayoutFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeFormatter for LayoutFormatter {
    fn name(&self) -> &str {
        "layout"
    }

    fn format(&self, code: &str) -> Result<String> {
        let mut out: Vec<&str> = Vec::new();
        let mut pending_blank = 0;
        let mut after_top_level_block = false;
        let continued = continued_string_lines(code);
        // `out[..frozen]` may end inside a string literal and is never rewritten
        let mut frozen = 0;

        for (i, raw) in code.lines().enumerate() {
            let ends_in_string = continued.get(i + 1).copied().unwrap_or(false);
            let line = if ends_in_string { raw } else { raw.trim_end() };

            if continued.get(i).copied().unwrap_or(false) {
                out.push(line);
                frozen = out.len();
                continue;
            }
            if line.is_empty() {
                pending_blank += 1;
                continue;
            }

            let indent = indent_of(line);
            let body = line.trim_start();
            let top_level = indent == 0;

            if is_definition(body) {
                let mut attached = Vec::new();
                if pending_blank == 0 {
                    while let Some(last) = out.last().copied() {
                        if out.len() > frozen
                            && !last.is_empty()
                            && indent_of(last) == indent
                            && is_comment(last)
                        {
                            attached.push(last);
                            out.pop();
                        } else {
                            break;
                        }
                    }
                    attached.reverse();
                }
                while out.len() > frozen && out.last().is_some_and(|l| l.is_empty()) {
                    out.pop();
                }

                let required = if top_level {
                    self.max_blank_lines.max(1)
                } else {
                    1
                };
                if !suppresses_blank_lines(out.last().copied()) {
                    out.extend(std::iter::repeat_n("", required));
                }
                out.extend(attached);
                out.push(line);

                if top_level && !body.starts_with('@') {
                    after_top_level_block = true;
                }
            } else {
                let blanks = if suppresses_blank_lines(out.last().copied()) {
                    0
                } else if top_level && after_top_level_block && starts_statement(body) {
                    self.max_blank_lines
                } else if top_level {
                    pending_blank.min(self.max_blank_lines)
                } else {
                    pending_blank.min(1)
                };
                out.extend(std::iter::repeat_n("", blanks));
                out.push(line);

                if top_level && starts_statement(body) {
                    after_top_level_block = false;
                }
            }

            pending_blank = 0;
        }

        if out.is_empty() {
            return Ok(String::new());
        }
        let mut formatted = out.join("\n");
        formatted.push('\n');
        Ok(formatted)
    }
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn is_definition(body: &str) -> bool {
    body.starts_with("class ")
        || body.starts_with("def ")
        || body.starts_with("async def ")
        || body.starts_with('@')
}

/// A line that begins a new statement rather than closing a bracket.
fn starts_statement(body: &str) -> bool {
    body.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '"' || c == '\'')
}

/// No blank lines at the start of the file, after a decorator or after a
/// block opener.
fn suppresses_blank_lines(previous: Option<&str>) -> bool {
    match previous {
        None => true,
        Some(line) => {
            let body = line.trim_start();
            body.starts_with('@') || (!is_comment(line) && body.ends_with(':'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(code: &str) -> String {
        LayoutFormatter::new().format(code).unwrap()
    }

    #[test]
    fn test_two_blank_lines_before_top_level_classes() {
        assert_eq!(
            format("import os\nclass A:\n    x = 1\nclass B:\n    y = 2\n"),
            "import os\n\n\nclass A:\n    x = 1\n\n\nclass B:\n    y = 2\n"
        );
    }

    #[test]
    fn test_caps_blank_line_runs() {
        assert_eq!(format("x = 1\n\n\n\n\ny = 2\n"), "x = 1\n\n\ny = 2\n");
        assert_eq!(
            format("class A:\n    x = 1\n\n\n\n    y = 2\n"),
            "class A:\n    x = 1\n\n    y = 2\n"
        );
    }

    #[test]
    fn test_strips_trailing_whitespace_and_edges() {
        assert_eq!(format("\n\nx = 1   \n\n\n"), "x = 1\n");
        assert_eq!(format("   \n\n"), "");
    }

    #[test]
    fn test_no_blank_lines_after_opener_or_decorator() {
        assert_eq!(
            format("class A:\n\n\n    @classmethod\n\n    def f(cls):\n\n        return 1\n"),
            "class A:\n    @classmethod\n    def f(cls):\n        return 1\n"
        );
    }

    #[test]
    fn test_nested_definitions_get_one_blank_line() {
        assert_eq!(
            format("class A:\n    x = 1\n    def f(self):\n        pass\n"),
            "class A:\n    x = 1\n\n    def f(self):\n        pass\n"
        );
    }

    #[test]
    fn test_comments_stay_attached_to_definitions() {
        assert_eq!(
            format("x = 1\n# about A\nclass A:\n    pass\n"),
            "x = 1\n\n\n# about A\nclass A:\n    pass\n"
        );
    }

    #[test]
    fn test_statement_after_block_gets_two_blank_lines() {
        assert_eq!(
            format("class A:\n    pass\nX = [\n    1,\n]\n"),
            "class A:\n    pass\n\n\nX = [\n    1,\n]\n"
        );
    }

    #[test]
    fn test_idempotent() {
        let once = format("import os\nclass A:\n\n    x = 1\n    @property\n    def y(self):\n        return 2\nZ = A()\n");
        assert_eq!(format(&once), once);
    }

    #[test]
    fn test_multiline_strings_are_kept_verbatim() {
        let code = "X = \"\"\"first\n\n\n\nlast\"\"\"\n\n\nY = \"\"\"\nclass Inside:\n\"\"\"\n";
        assert_eq!(format(code), code);

        let docstring = "class A:\n    \"\"\"Doc.   \n\n\n\n    # More.\n    \"\"\"\n    x = 1\n";
        assert_eq!(format(docstring), docstring);
    }
}
