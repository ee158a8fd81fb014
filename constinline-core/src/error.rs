//! Typed error handling for constinline.
//!
//! Every failure that aborts an analysis session is represented here so
//! build integrations can match on the cause. Unresolvable enum references
//! are deliberately absent: they are not errors, the reference is simply
//! left in the source.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for constinline operations.
#[derive(Error, Debug)]
pub enum InlineError {
    /// I/O error when reading source files or configuration
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Syntax error when parsing a TypeScript module
    #[error("Parse error in {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// Bad tsconfig, constinline.toml or file pattern
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A const enum member whose initializer cannot be evaluated statically
    #[error("Unsupported member {enum_name}.{member} in {module}: {reason}")]
    UnsupportedMember {
        enum_name: String,
        member: String,
        module: String,
        reason: String,
    },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl InlineError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error without location.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a parse error with line/column info.
    pub fn parse_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-member error naming the enum and member.
    pub fn unsupported_member(
        module: impl Into<String>,
        enum_name: impl Into<String>,
        member: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedMember {
            enum_name: enum_name.into(),
            member: member.into(),
            module: module.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Parse { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for constinline results.
pub type InlineResult<T> = Result<T, InlineError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> InlineResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> InlineResult<T> {
        self.map_err(|e| InlineError::io(path, e))
    }
}
