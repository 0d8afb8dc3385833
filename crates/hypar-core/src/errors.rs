//! Structured error types shared across the hypar crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`HyparError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for the partitioning engine.
///
/// Data-structure preconditions (contracting a disabled vertex, moving a
/// vertex to the block it is already in, ...) are programming errors and are
/// enforced by assertions, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum HyparError {
    /// Invalid run configuration, detected before partitioning starts.
    #[error("configuration error: {0}")]
    Config(ErrorInfo),
    /// Malformed or inconsistent input files.
    #[error("input error: {0}")]
    Input(ErrorInfo),
    /// No feasible partition exists for the given constraints.
    #[error("infeasible: {0}")]
    Infeasible(ErrorInfo),
    /// A post-run self check failed; this is a bug in the engine.
    #[error("internal error: {0}")]
    Internal(ErrorInfo),
}

impl HyparError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            HyparError::Config(info)
            | HyparError::Input(info)
            | HyparError::Infeasible(info)
            | HyparError::Internal(info) => info,
        }
    }

    /// Shorthand for an infeasible-initial-partitioning failure.
    pub fn initial_partitioning_infeasible(message: impl Into<String>) -> Self {
        HyparError::Infeasible(ErrorInfo::new(
            "initial-partitioning-infeasible",
            message.into(),
        ))
    }
}
