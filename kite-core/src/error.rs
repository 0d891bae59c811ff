use thiserror::Error;

/// Errors produced while turning Kite source into an IR module.
///
/// Every fallible step in the pipeline returns one of these through a
/// plain `Result`; there are no sentinel values. The compile loop in
/// [`crate::compiler`] downgrades per-statement errors to diagnostics
/// and keeps going.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },
    #[error("integer literal '{0}' is out of range")]
    IntOutOfRange(String),
    #[error("expression nesting exceeds {0} levels")]
    TooDeep(usize),
    #[error("undefined symbol '{0}'")]
    UndefinedSymbol(String),
    #[error("call to '{name}' does not match its declaration: {reason}")]
    SignatureMismatch { name: String, reason: String },
    #[error("unsupported call argument: {0}")]
    UnsupportedArgument(String),
}

impl CompileError {
    /// Byte offset the error points at, if it carries one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            CompileError::Parse { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
