//! Error types for Stackforge.
//!
//! This module defines the error types used throughout Stackforge, providing
//! rich error information for debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stackforge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Stackforge.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Stack Errors
    // ========================================================================
    /// A resource was added under a logical id that is already taken.
    #[error("Duplicate logical id '{0}' in stack")]
    DuplicateLogicalId(String),

    /// A construct id sanitized down to an empty logical id.
    #[error("Invalid logical id '{0}': no alphanumeric characters remain after sanitization")]
    InvalidLogicalId(String),

    // ========================================================================
    // Graph Errors
    // ========================================================================
    /// A declaration refers to a logical id that no declared resource carries.
    #[error("Unresolved reference: {referrer} refers to undeclared resource '{target}'")]
    UnresolvedReference {
        /// The resource or output holding the dangling reference
        referrer: String,
        /// The logical id that failed to resolve
        target: String,
    },

    /// The reference graph contains a cycle.
    #[error("Dependency cycle among resources: {}", members.join(" -> "))]
    DependencyCycle {
        /// Logical ids participating in the cycle
        members: Vec<String>,
    },

    // ========================================================================
    // Synthesis Errors
    // ========================================================================
    /// Writing a cloud assembly file failed.
    #[error("Failed to write assembly file '{path}'")]
    AssemblyIo {
        /// Path of the file being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serializing the template to JSON failed.
    #[error("Template serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Serializing the template to YAML failed.
    #[error("Template serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml::Error),
}

impl Error {
    /// Creates a new unresolved-reference error.
    pub fn unresolved(referrer: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            referrer: referrer.into(),
            target: target.into(),
        }
    }

    /// Returns true if this error means the declared graph is not valid,
    /// as opposed to an environmental failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::DuplicateLogicalId(_)
                | Error::InvalidLogicalId(_)
                | Error::UnresolvedReference { .. }
                | Error::DependencyCycle { .. }
        )
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::DuplicateLogicalId(_)
            | Error::InvalidLogicalId(_)
            | Error::UnresolvedReference { .. }
            | Error::DependencyCycle { .. } => 2,
            Error::AssemblyIo { .. } => 3,
            Error::JsonSerialization(_) | Error::YamlSerialization(_) => 4,
        }
    }
}
