//! Code formatter contract and the external command formatter.

use std::{
    io::Write,
    process::{Command, Stdio},
    thread,
};

use tracing::debug;

use crate::{Error, Result};

/// Rewrites generated code.
///
/// Formatting is total: a formatter either returns the complete new text or
/// fails the run.
pub trait CodeFormatter: Send + Sync {
    /// Name used in errors and logs.
    fn name(&self) -> &str;

    fn format(&self, code: &str) -> Result<String>;
}

/// Pipes code through an external program's stdin and takes its stdout.
///
/// ```no_run
/// use litgen_codegen::{CodeFormatter, CommandFormatter};
///
/// let black = CommandFormatter::new("black").arg("-q").arg("-");
/// let formatted = black.format("x=1\n")?;
/// # Ok::<(), litgen_codegen::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build from a full argument vector (program first).
    pub fn from_argv<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv
            .next()
            .ok_or_else(|| Error::configuration("formatter command is empty"))?;
        Ok(Self {
            program,
            args: argv.collect(),
        })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::Format {
            formatter: self.program.clone(),
            reason: reason.into(),
        }
    }
}

impl CodeFormatter for CommandFormatter {
    fn name(&self) -> &str {
        &self.program
    }

    fn format(&self, code: &str) -> Result<String> {
        debug!(program = %self.program, args = ?self.args, "running external formatter");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.error(format!("failed to start: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.error("stdin is not available"))?;
        let input = code.to_string();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|e| self.error(format!("failed to wait for process: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.error(format!("exited with {}: {}", output.status, stderr.trim())));
        }

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(self.error(format!("failed to write stdin: {e}"))),
            Err(_) => return Err(self.error("stdin writer panicked")),
        }

        String::from_utf8(output.stdout).map_err(|_| self.error("output is not valid UTF-8"))
    }
}
