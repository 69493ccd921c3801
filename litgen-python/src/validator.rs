//! Structural syntax check for generated Python.
//!
//! Not a parser: the validator tokenizes just enough to find string
//! literals, comments and brackets, splits the text into logical lines and
//! checks the indentation structure between them.

use litgen_codegen::{CodeValidator, Diagnostic};

const NAME: &str = "python-syntax";

/// Statements that open an indented block when they end with `:`.
const BLOCK_KEYWORDS: &[&str] = &[
    "class", "def", "if", "elif", "else", "for", "while", "try", "except", "finally", "with",
    "match", "case",
];

/// Rejects generated Python with unbalanced brackets, unterminated strings
/// or broken block indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonSyntaxValidator;

impl PythonSyntaxValidator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeValidator for PythonSyntaxValidator {
    fn name(&self) -> &str {
        NAME
    }

    fn check(&self, code: &str, diagnostics: &mut Vec<Diagnostic>) {
        match logical_lines(code) {
            Ok(lines) => check_indentation(&lines, diagnostics),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }

        for (i, line) in code.lines().enumerate() {
            let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
            if indent.contains('\t') {
                diagnostics.push(
                    Diagnostic::warning(NAME, "tab used for indentation").at_line(i + 1),
                );
            }
        }
    }
}

/// One statement, possibly spanning several physical lines.
#[derive(Debug)]
struct LogicalLine {
    /// 1-based number of the first physical line.
    line: usize,
    indent: usize,
    /// Statement text without comments, trimmed.
    text: String,
}

impl LogicalLine {
    fn opens_block(&self) -> Option<&str> {
        if !self.text.ends_with(':') {
            return None;
        }
        let text = self.text.strip_prefix("async ").unwrap_or(&self.text);
        let keyword_len = text
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(text.len());
        let keyword = &text[..keyword_len];
        BLOCK_KEYWORDS.iter().copied().find(|k| *k == keyword)
    }
}

struct OpenString {
    quote: char,
    triple: bool,
    line: usize,
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Split `code` into logical lines, failing on the first lexical error.
fn logical_lines(code: &str) -> Result<Vec<LogicalLine>, Diagnostic> {
    let chars: Vec<char> = code.chars().collect();
    let mut lines = Vec::new();
    let mut brackets: Vec<(char, usize)> = Vec::new();
    let mut string: Option<OpenString> = None;

    let mut line = 1;
    let mut current = String::new();
    let mut start: Option<(usize, usize)> = None;
    let mut at_line_start = true;
    let mut indent = 0;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if let Some(open) = &string {
            match c {
                '\\' => {
                    current.push(c);
                    if let Some(&next) = chars.get(i + 1) {
                        current.push(next);
                        if next == '\n' {
                            line += 1;
                        }
                        i += 1;
                    }
                }
                '\n' if !open.triple => {
                    return Err(Diagnostic::error(NAME, "unterminated string literal")
                        .at_line(open.line));
                }
                '\n' => {
                    current.push(c);
                    line += 1;
                }
                q if q == open.quote => {
                    let closes = !open.triple
                        || (chars.get(i + 1) == Some(&q) && chars.get(i + 2) == Some(&q));
                    if closes {
                        let width = if open.triple { 3 } else { 1 };
                        current.extend(std::iter::repeat_n(q, width));
                        i += width - 1;
                        string = None;
                    } else {
                        current.push(c);
                    }
                }
                _ => current.push(c),
            }
            i += 1;
            continue;
        }

        if at_line_start {
            match c {
                ' ' | '\t' => {
                    indent += 1;
                    i += 1;
                    continue;
                }
                _ => at_line_start = false,
            }
        }

        match c {
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '\\' if chars.get(i + 1) == Some(&'\n') => {
                line += 1;
                i += 2;
                continue;
            }
            '\n' => {
                line += 1;
                if brackets.is_empty() {
                    if let Some((first, indent)) = start.take() {
                        lines.push(LogicalLine {
                            line: first,
                            indent,
                            text: current.trim().to_string(),
                        });
                    }
                    current.clear();
                    at_line_start = true;
                    indent = 0;
                } else {
                    current.push(' ');
                }
                i += 1;
                continue;
            }
            _ => {}
        }

        if start.is_none() && !c.is_whitespace() {
            start = Some((line, indent));
        }

        match c {
            '"' | '\'' => {
                let triple = chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c);
                string = Some(OpenString {
                    quote: c,
                    triple,
                    line,
                });
                let width = if triple { 3 } else { 1 };
                current.extend(std::iter::repeat_n(c, width));
                i += width;
                continue;
            }
            '(' | '[' | '{' => brackets.push((c, line)),
            ')' | ']' | '}' => match brackets.pop() {
                Some((open, _)) if closing_for(open) == c => {}
                Some((open, open_line)) => {
                    return Err(Diagnostic::error(
                        NAME,
                        format!("closing '{c}' does not match '{open}' opened on line {open_line}"),
                    )
                    .at_line(line));
                }
                None => {
                    return Err(Diagnostic::error(NAME, format!("unmatched '{c}'")).at_line(line));
                }
            },
            _ => {}
        }
        current.push(c);
        i += 1;
    }

    if let Some(open) = string {
        return Err(Diagnostic::error(NAME, "unterminated string literal").at_line(open.line));
    }
    if let Some((open, open_line)) = brackets.pop() {
        return Err(Diagnostic::error(NAME, format!("'{open}' was never closed")).at_line(open_line));
    }
    if let Some((first, indent)) = start {
        lines.push(LogicalLine {
            line: first,
            indent,
            text: current.trim().to_string(),
        });
    }

    Ok(lines)
}

/// For each physical line of `code`, whether it starts inside a string
/// literal opened on an earlier line.
///
/// Uses the same quoting rules as the logical line splitter but never
/// fails: an unescaped newline ends a single-quoted string.
pub(crate) fn continued_string_lines(code: &str) -> Vec<bool> {
    let chars: Vec<char> = code.chars().collect();
    let mut flags = Vec::new();
    let mut string: Option<OpenString> = None;
    let mut line = 1;

    let mut i = 0;
    while i < chars.len() {
        if i == 0 || chars[i - 1] == '\n' {
            flags.push(string.is_some());
        }
        let c = chars[i];

        if let Some(open) = &string {
            match c {
                '\\' => {
                    if chars.get(i + 1) == Some(&'\n') {
                        line += 1;
                    }
                    i += 1;
                }
                '\n' => {
                    line += 1;
                    if !open.triple {
                        string = None;
                    }
                }
                q if q == open.quote => {
                    if !open.triple {
                        string = None;
                    } else if chars.get(i + 1) == Some(&q) && chars.get(i + 2) == Some(&q) {
                        string = None;
                        i += 2;
                    }
                }
                _ => {}
            }
            i += 1;
            continue;
        }

        match c {
            '#' => {
                while i + 1 < chars.len() && chars[i + 1] != '\n' {
                    i += 1;
                }
            }
            '\n' => line += 1,
            '"' | '\'' => {
                let triple = chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c);
                string = Some(OpenString {
                    quote: c,
                    triple,
                    line,
                });
                if triple {
                    i += 2;
                }
            }
            _ => {}
        }
        i += 1;
    }

    flags
}

/// Check block structure the way Python's tokenizer tracks INDENT/DEDENT.
fn check_indentation(lines: &[LogicalLine], diagnostics: &mut Vec<Diagnostic>) {
    let mut levels = vec![0];
    let mut pending_block: Option<(&str, usize)> = None;

    for logical in lines {
        let top = levels.last().copied().unwrap_or(0);

        if let Some((keyword, header_line)) = pending_block.take() {
            if logical.indent <= top {
                diagnostics.push(
                    Diagnostic::error(
                        NAME,
                        format!("expected an indented block after '{keyword}' on line {header_line}"),
                    )
                    .at_line(logical.line),
                );
                return;
            }
            levels.push(logical.indent);
        } else if logical.indent > top {
            diagnostics.push(Diagnostic::error(NAME, "unexpected indent").at_line(logical.line));
            return;
        } else if logical.indent < top {
            while levels.last().is_some_and(|level| *level > logical.indent) {
                levels.pop();
            }
            if levels.last() != Some(&logical.indent) {
                diagnostics.push(
                    Diagnostic::error(NAME, "unindent does not match any outer indentation level")
                        .at_line(logical.line),
                );
                return;
            }
        }

        pending_block = logical.opens_block().map(|keyword| (keyword, logical.line));
    }

    if let Some((keyword, header_line)) = pending_block {
        diagnostics.push(
            Diagnostic::error(
                NAME,
                format!("expected an indented block after '{keyword}' on line {header_line}"),
            )
            .at_line(header_line),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(code: &str) -> Result<(), Diagnostic> {
        PythonSyntaxValidator.validate(code)
    }

    #[test]
    fn test_accepts_generated_module() {
        let code = r#""""Generated."""

from typing import Literal


class Foo(Base):
    """Foo"""

    name: Literal["a (b"] = "a (b"  # comment with ( bracket


class Things:
    FOO = Foo()

    ONE_OF = Annotated[
        Union[tuple(Base.__subclasses__())],
        Field(discriminator="name"),
    ]

    @classmethod
    def get(cls, key: str):
        return cls.mapping[key]
"#;
        assert_eq!(validate(code), Ok(()));
    }

    #[test]
    fn test_unclosed_bracket() {
        let err = validate("x = (1,\ny = 2\n").unwrap_err();
        assert_eq!(err.message, "'(' was never closed");
        assert_eq!(err.location.as_deref(), Some("line 1"));
    }

    #[test]
    fn test_mismatched_bracket() {
        let err = validate("x = [1, 2)\n").unwrap_err();
        assert!(err.message.contains("does not match '['"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = validate("class A:\n    name = \"open\n").unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
        assert_eq!(err.location.as_deref(), Some("line 2"));

        assert!(validate("x = \"\"\"never closed\n\n").is_err());
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        assert!(validate("x = \"say \\\"hi\\\"\"\n").is_ok());
        assert!(validate("x = 'it\\'s'\n").is_ok());
    }

    #[test]
    fn test_block_without_body() {
        let err = validate("class A:\n\nx = 1\n").unwrap_err();
        assert!(err.message.contains("expected an indented block after 'class'"));

        let err = validate("def f():\n").unwrap_err();
        assert_eq!(err.location.as_deref(), Some("line 1"));
    }

    #[test]
    fn test_unexpected_indent() {
        let err = validate("x = 1\n    y = 2\n").unwrap_err();
        assert_eq!(err.message, "unexpected indent");
        assert_eq!(err.location.as_deref(), Some("line 2"));
    }

    #[test]
    fn test_inconsistent_dedent() {
        let err = validate("class A:\n    x = 1\n  y = 2\n").unwrap_err();
        assert!(err.message.starts_with("unindent does not match"));
    }

    #[test]
    fn test_one_line_block_and_continuation() {
        assert!(validate("class A: pass\nx = 1 + \\\n    2\n").is_ok());
    }

    #[test]
    fn test_tab_indentation_is_only_a_warning() {
        assert!(validate("class A:\n\tx = 1\n").is_ok());
        let mut diagnostics = Vec::new();
        PythonSyntaxValidator.check("class A:\n\tx = 1\n", &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].severity.is_warning());
    }

    #[test]
    fn test_continued_string_lines() {
        let code = "X = \"\"\"first\n\nlast\"\"\"\nY = 'a # b'\n# \"not a string\nZ = 1";
        assert_eq!(
            continued_string_lines(code),
            [false, true, true, false, false, false]
        );
        assert_eq!(continued_string_lines(code).len(), code.lines().count());
    }

    #[test]
    fn test_continued_string_lines_after_escaped_newline() {
        let code = "x = \"a\\\nb\"\ny = '''\n'''\n";
        assert_eq!(continued_string_lines(code), [false, true, false, true]);
    }
}
