//! Request-level command resolution.
//!
//! The entry point for a run request: checks the request shape, then defers
//! to [`validate_command_consistency`] for the display-text check.

use crate::error::Rejection;
use crate::request::RunRequest;
use crate::validate::validate_command_consistency;
use serde::Serialize;

/// A normalized, ready-to-execute command description.
///
/// This type can only be produced by [`resolve_run_command`], so a display text
/// is never attached to an empty argv.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCommand {
    pub(crate) argv: Vec<String>,
    pub(crate) raw_command: Option<String>,
    pub(crate) shell_command: Option<String>,
    pub(crate) cmd_text: String,
}

impl ResolvedCommand {
    /// The argv that will execute.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The caller's display text, trimmed, if one was supplied.
    pub fn raw_command(&self) -> Option<&str> {
        self.raw_command.as_deref()
    }

    /// Shell text, set only for recognized wrapper invocations.
    pub fn shell_command(&self) -> Option<&str> {
        self.shell_command.as_deref()
    }

    /// The text to show an approver.
    pub fn cmd_text(&self) -> &str {
        &self.cmd_text
    }

    /// True when there is nothing to execute.
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

/// Resolve a run request into a [`ResolvedCommand`].
///
/// # Errors
///
/// - [`Rejection::MissingCommand`] if display text is given without an argv
/// - [`Rejection::RawCommandMismatch`] if the display text does not match the argv
pub fn resolve_run_command(request: &RunRequest) -> Result<ResolvedCommand, Rejection> {
    let raw = request.raw_command();
    let argv = request.argv();

    if argv.is_empty() {
        if raw.is_some() {
            tracing::warn!("Display text supplied without a command");
            return Err(Rejection::MissingCommand);
        }
        return Ok(ResolvedCommand {
            argv,
            raw_command: None,
            shell_command: None,
            cmd_text: String::new(),
        });
    }

    let validated = validate_command_consistency(&argv, raw.as_deref())?;

    Ok(ResolvedCommand {
        argv,
        raw_command: raw,
        shell_command: validated.shell_command,
        cmd_text: validated.cmd_text,
    })
}
