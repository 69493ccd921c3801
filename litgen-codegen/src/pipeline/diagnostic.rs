//! Diagnostics reported by code validators.

use std::fmt;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Rejects the generated code.
    Error,
    /// Reported but does not stop generation.
    Warning,
    Info,
}

impl Severity {
    /// Returns true if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns true if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A finding about generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Name of the validator that produced this diagnostic.
    pub validator: String,
    pub message: String,
    /// Optional location in the generated text (e.g., "line 12").
    pub location: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, validator, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, validator, message)
    }

    /// Create a new info diagnostic.
    pub fn info(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, validator, message)
    }

    fn new(severity: Severity, validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            validator: validator.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Add a location to this diagnostic.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Point this diagnostic at a 1-based line of the generated text.
    pub fn at_line(self, line: usize) -> Self {
        self.at(format!("line {line}"))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " (at {})", loc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error("syntax", "unclosed '('");
        assert!(diag.severity.is_error());
        assert_eq!(diag.validator, "syntax");
    }

    #[test]
    fn test_diagnostic_with_location() {
        let diag = Diagnostic::warning("syntax", "tab indentation").at_line(3);
        assert!(diag.severity.is_warning());
        assert_eq!(diag.to_string(), "warning: tab indentation (at line 3)");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Info.to_string(), "info");
    }
}
