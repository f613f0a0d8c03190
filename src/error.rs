//! Error types for exec_guard.
//!
//! Two rejection kinds exist, both recoverable by the caller:
//! - [`Rejection::RawCommandMismatch`]: the display text cannot be derived from the argv
//! - [`Rejection::MissingCommand`]: display text was supplied without an executable target
//!
//! Everything else (unknown wrapper flags, non-portable env keys, empty tokens)
//! degrades to "not a wrapper" or "drop this entry" and never surfaces here.

use serde_json::{json, Value};
use thiserror::Error;

/// Stable machine-readable code carried in [`Rejection::details`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionCode {
    /// Display text does not match the argv
    RawCommandMismatch,
    /// Display text supplied without an argv
    MissingCommand,
}

impl RejectionCode {
    /// Wire form, e.g. `RAW_COMMAND_MISMATCH`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionCode::RawCommandMismatch => "RAW_COMMAND_MISMATCH",
            RejectionCode::MissingCommand => "MISSING_COMMAND",
        }
    }
}

impl std::fmt::Display for RejectionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command request that must not proceed to approval or execution.
///
/// The `Display` output is the wire message. It never contains environment values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The supplied display text differs from the text inferred from argv.
    #[error("INVALID_REQUEST: rawCommand does not match command")]
    RawCommandMismatch { raw_command: String, inferred: String },

    /// Display text was supplied but the argv is empty.
    #[error("rawCommand requires params.command")]
    MissingCommand,
}

impl Rejection {
    /// The machine-readable code for this rejection.
    pub fn code(&self) -> RejectionCode {
        match self {
            Rejection::RawCommandMismatch { .. } => RejectionCode::RawCommandMismatch,
            Rejection::MissingCommand => RejectionCode::MissingCommand,
        }
    }

    /// Structured details: `{ "code": ..., ...context }`.
    pub fn details(&self) -> Value {
        match self {
            Rejection::RawCommandMismatch {
                raw_command,
                inferred,
            } => json!({
                "code": self.code().as_str(),
                "rawCommand": raw_command,
                "inferred": inferred,
            }),
            Rejection::MissingCommand => json!({ "code": self.code().as_str() }),
        }
    }
}

/// Error for the combined [`ExecGuard::prepare`](crate::ExecGuard::prepare) flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// The request itself was rejected.
    #[error(transparent)]
    Rejected(#[from] Rejection),
}

impl GuardError {
    /// The underlying rejection.
    pub fn rejection(&self) -> &Rejection {
        match self {
            GuardError::Rejected(r) => r,
        }
    }
}
