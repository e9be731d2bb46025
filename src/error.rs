//! Error types for efetch
//!
//! Nothing in the fetch path is allowed to fail the caller, so these errors
//! never reach `main`. They exist to give every degraded outcome a concrete
//! reason: package probes carry them inside `SourceOutcome::Failed`, and the
//! logo registry reports rejected patterns with them.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a package source or logo pattern could not be used
#[derive(Error, Debug)]
pub enum FetchError {
    /// The probe executable could not be spawned at all
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The probe executable ran but exited unsuccessfully
    #[error("{program} exited with {}", describe_exit(.code))]
    CommandFailed { program: String, code: Option<i32> },

    /// A directory glob could not be parsed
    #[error("invalid glob {pattern:?}: {message}")]
    Glob { pattern: String, message: String },

    /// Recursive enumeration of a matched directory failed
    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A regular expression failed to compile
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A probe thread panicked before reporting
    #[error("probe for {0} panicked")]
    Panicked(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

impl FetchError {
    /// Create a glob error from any displayable parser error
    pub fn glob(pattern: impl Into<String>, message: impl ToString) -> Self {
        Self::Glob {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// Create a pattern error for a regex that failed to compile
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }
}
