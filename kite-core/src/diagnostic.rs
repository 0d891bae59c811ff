//! Diagnostics reported while compiling a single source file.
//!
//! The compile loop keeps going after per-statement failures, so
//! errors are collected as values rather than aborting. The CLI is
//! responsible for rendering them to stderr.

use core::fmt;

use crate::error::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single reported problem, anchored to a byte offset in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub offset: usize,
    pub code: Option<&'static str>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, offset: usize) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            offset,
            code: None,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Wrap a pipeline error, anchored at `fallback_offset` unless the
    /// error itself carries a position.
    pub fn from_error(err: &CompileError, fallback_offset: usize) -> Self {
        Diagnostic::error(err.to_string(), err.offset().unwrap_or(fallback_offset))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match self.code {
            Some(code) => write!(f, "{severity}[{code}]: {}", self.message),
            None => write!(f, "{severity}: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_severity_and_code() {
        let diag = Diagnostic::error("unexpected character", 3).with_code("E0001");
        assert_eq!(diag.to_string(), "error[E0001]: unexpected character");
    }

    #[test]
    fn keeps_error_offset_when_present() {
        let err = CompileError::Parse {
            offset: 17,
            message: "expected ')'".into(),
        };
        let diag = Diagnostic::from_error(&err, 0);
        assert_eq!(diag.offset, 17);
    }
}
