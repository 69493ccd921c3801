//! Code validator contract.

use tracing::{debug, warn};

use super::Diagnostic;

/// Checks generated code before it is formatted.
///
/// Implementations report findings through [`check`](Self::check). Any
/// error-severity diagnostic rejects the code; warnings are logged.
pub trait CodeValidator: Send + Sync {
    /// Name used in diagnostics and logs.
    fn name(&self) -> &str;

    /// Inspect `code` and record findings.
    fn check(&self, code: &str, diagnostics: &mut Vec<Diagnostic>);

    /// Accept the code, or return the first error diagnostic.
    fn validate(&self, code: &str) -> Result<(), Diagnostic> {
        let mut diagnostics = Vec::new();
        self.check(code, &mut diagnostics);

        let mut first_error = None;
        for diagnostic in diagnostics {
            if diagnostic.severity.is_error() {
                first_error.get_or_insert(diagnostic);
            } else if diagnostic.severity.is_warning() {
                warn!(validator = self.name(), "{diagnostic}");
            } else {
                debug!(validator = self.name(), "{diagnostic}");
            }
        }

        match first_error {
            Some(diagnostic) => Err(diagnostic),
            None => Ok(()),
        }
    }
}
