//! Consistency between display text and argv.
//!
//! The text an approver sees must be derivable from the argv that will run.
//! For wrapper invocations that text is the wrapper's inline command; for
//! direct invocations it is the formatted argv. Any divergence is rejected.

use crate::error::Rejection;
use crate::format::{format_exec_command, trim_text};
use crate::inline::extract_inline_command;
use serde::Serialize;

/// Accepted outcome of [`validate_command_consistency`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedCommand {
    /// Shell text, set only when `argv[0]` resolved to a known wrapper.
    pub shell_command: Option<String>,
    /// The single text to show an approver.
    pub cmd_text: String,
}

/// Collapse absent or blank display text to `None`; otherwise trim it.
pub fn normalize_raw_command(raw_command: Option<&str>) -> Option<String> {
    raw_command
        .map(trim_text)
        .filter(|raw| !raw.is_empty())
        .map(str::to_string)
}

/// Check that `raw_command` (if any) describes the same operation as `argv`.
///
/// # Errors
///
/// Returns [`Rejection::RawCommandMismatch`] when the normalized display text
/// differs from the text inferred from `argv`.
pub fn validate_command_consistency(
    argv: &[String],
    raw_command: Option<&str>,
) -> Result<ValidatedCommand, Rejection> {
    let raw = normalize_raw_command(raw_command);
    let inline = extract_inline_command(argv).map(|inline| inline.command);
    let inferred = match &inline {
        Some(command) => trim_text(command).to_string(),
        None => format_exec_command(argv),
    };

    if let Some(raw) = &raw {
        if *raw != inferred {
            tracing::warn!(
                raw_command = %raw,
                inferred = %inferred,
                "Display text does not match argv"
            );
            return Err(Rejection::RawCommandMismatch {
                raw_command: raw.clone(),
                inferred,
            });
        }
    }

    let shell_command = inline
        .as_ref()
        .map(|command| raw.clone().unwrap_or_else(|| command.clone()));
    let cmd_text = raw.or(inline).unwrap_or(inferred);

    Ok(ValidatedCommand {
        shell_command,
        cmd_text,
    })
}
