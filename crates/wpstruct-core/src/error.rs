use std::fmt;
use std::io;

use thiserror::Error;

use crate::value::ValueKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("field '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: ValueKind,
    },
    #[error("field '{path}': '{value}' is not a valid integer")]
    InvalidInteger { path: String, value: String },
    #[error("field '{path}': '{value}' is not a valid boolean")]
    InvalidBoolean { path: String, value: String },
    #[error("field '{path}': '{value}' is not a recognised date")]
    InvalidDate { path: String, value: String },
}

impl CoerceError {
    pub fn path(&self) -> &str {
        match self {
            CoerceError::TypeMismatch { path, .. }
            | CoerceError::InvalidInteger { path, .. }
            | CoerceError::InvalidBoolean { path, .. }
            | CoerceError::InvalidDate { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) could not be populated: {}", .errors.len(), join_errors(.errors))]
pub struct PopulateError {
    pub errors: Vec<CoerceError>,
}

fn join_errors(errors: &[CoerceError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// Non-fatal: the offending key was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub key: String,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    MalformedJson(String),
    UnresolvedType(String),
    NotAnObject { index: usize },
    Coercion(CoerceError),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::MalformedJson(e) => {
                write!(f, "key '{}' skipped: invalid JSON array: {}", self.key, e)
            }
            DiagnosticKind::UnresolvedType(name) => {
                write!(f, "key '{}' skipped: no record type named '{}'", self.key, name)
            }
            DiagnosticKind::NotAnObject { index } => {
                write!(f, "key '{}' skipped: element {} is not an object", self.key, index)
            }
            DiagnosticKind::Coercion(e) => write!(f, "key '{}': {}", self.key, e),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid format at line {line}: continuation '{content}' has no preceding key")]
    InvalidFormat { line: usize, content: String },
    #[error("strict parse rejected {} diagnostic(s)", .diagnostics.len())]
    Rejected { diagnostics: Vec<Diagnostic> },
}
