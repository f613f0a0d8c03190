//! Inline command extraction from wrapper argv.
//!
//! Given an argv whose first token is a wrapper (see [`WrapperKind`]), find the
//! command text the wrapper will run. Nested `env` wrappers are unwrapped up to
//! [`MAX_UNWRAP_DEPTH`] levels; deeper chains are treated as having no inline
//! command.

use crate::env_unwrap::unwrap_env_invocation;
use crate::format::trim_text;
use crate::wrapper::WrapperKind;

/// Maximum number of wrapper levels inspected before giving up.
pub const MAX_UNWRAP_DEPTH: usize = 4;

/// Command text a wrapper will execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCommand {
    /// The wrapper that carries the command (innermost, after `env` unwrapping).
    pub wrapper: WrapperKind,
    /// Trimmed, non-empty command text.
    pub command: String,
}

/// Extract the inline command from an argv, or `None` for a direct invocation.
pub fn extract_inline_command(argv: &[String]) -> Option<InlineCommand> {
    let mut current = argv;

    for depth in 0..MAX_UNWRAP_DEPTH {
        let token0 = current.first()?.trim();
        if token0.is_empty() {
            return None;
        }

        let wrapper = WrapperKind::detect(token0)?;
        let command = match wrapper {
            WrapperKind::Env => {
                current = unwrap_env_invocation(current)?;
                tracing::debug!(depth, "Unwrapped env invocation");
                continue;
            }
            WrapperKind::PosixShell => posix_shell_inline_command(current),
            WrapperKind::WindowsCmd => cmd_inline_command(current),
            WrapperKind::PowerShell => powershell_inline_command(current),
        };

        return command.map(|command| InlineCommand { wrapper, command });
    }

    tracing::debug!(
        max_depth = MAX_UNWRAP_DEPTH,
        "Wrapper nesting too deep, treating as direct invocation"
    );
    None
}

/// Shorthand for [`extract_inline_command`] returning only the command text.
pub fn extract_shell_command(argv: &[String]) -> Option<String> {
    extract_inline_command(argv).map(|inline| inline.command)
}

/// `sh -c CMD`, `bash -lc CMD`, `zsh --command CMD`. Only `argv[1]` is inspected.
fn posix_shell_inline_command(argv: &[String]) -> Option<String> {
    let flag = argv.get(1)?.trim().to_ascii_lowercase();
    if !matches!(flag.as_str(), "-lc" | "-c" | "--command") {
        return None;
    }
    non_empty(argv.get(2)?)
}

/// `cmd /c CMD...`: everything after `/c`, joined with single spaces.
fn cmd_inline_command(argv: &[String]) -> Option<String> {
    let idx = argv
        .iter()
        .position(|token| token.trim().eq_ignore_ascii_case("/c"))?;
    let tail = &argv[idx + 1..];
    if tail.is_empty() {
        return None;
    }
    non_empty(&tail.join(" "))
}

/// `pwsh -Command CMD`. Scanning stops at a bare `--`.
fn powershell_inline_command(argv: &[String]) -> Option<String> {
    for (i, token) in argv.iter().enumerate().skip(1) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let lower = token.to_ascii_lowercase();
        if lower == "--" {
            break;
        }
        if matches!(lower.as_str(), "-c" | "-command" | "--command") {
            return non_empty(argv.get(i + 1)?);
        }
    }
    None
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = trim_text(s);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn shell(parts: &[&str]) -> Option<String> {
        extract_shell_command(&argv(parts))
    }

    #[test]
    fn test_posix_shell_flags() {
        assert_eq!(shell(&["bash", "-lc", "echo hi"]), Some("echo hi".into()));
        assert_eq!(shell(&["/bin/sh", "-c", "  ls -la  "]), Some("ls -la".into()));
        assert_eq!(shell(&["zsh", "--COMMAND", "pwd"]), Some("pwd".into()));
        assert_eq!(
            extract_inline_command(&argv(&["fish", "-c", "x"])).map(|i| i.wrapper),
            Some(WrapperKind::PosixShell)
        );
    }

    #[test]
    fn test_posix_shell_without_inline_command() {
        assert_eq!(shell(&["bash"]), None);
        assert_eq!(shell(&["bash", "script.sh"]), None);
        assert_eq!(shell(&["bash", "-c"]), None);
        assert_eq!(shell(&["bash", "-c", "   "]), None);
        // Only argv[1] is inspected.
        assert_eq!(shell(&["bash", "-x", "-c", "id"]), None);
    }

    #[test]
    fn test_cmd_tail_is_joined() {
        assert_eq!(
            shell(&["cmd.exe", "/d", "/s", "/C", "echo", "hello world"]),
            Some("echo hello world".into())
        );
        assert_eq!(shell(&["cmd", "/c"]), None);
        assert_eq!(shell(&["cmd", "/c", " "]), None);
        assert_eq!(shell(&["cmd", "/k", "dir"]), None);
    }

    #[test]
    fn test_powershell_command() {
        assert_eq!(
            shell(&["pwsh", "-NoProfile", "-Command", "Get-ChildItem"]),
            Some("Get-ChildItem".into())
        );
        assert_eq!(
            shell(&["powershell.exe", "-c", "whoami"]),
            Some("whoami".into())
        );
        assert_eq!(shell(&["pwsh", "--", "-c", "whoami"]), None);
        assert_eq!(shell(&["pwsh", "-File", "script.ps1"]), None);
        assert_eq!(shell(&["pwsh", "-Command"]), None);
    }

    #[test]
    fn test_env_unwraps_recursively() {
        assert_eq!(
            shell(&["env", "FOO=1", "bash", "-lc", "echo hi"]),
            Some("echo hi".into())
        );
        assert_eq!(
            shell(&["/usr/bin/env", "-i", "env", "A=b", "sh", "-c", "id"]),
            Some("id".into())
        );
    }

    #[test]
    fn test_env_unknown_flag_is_not_unwrapped() {
        assert_eq!(shell(&["env", "--weird", "bash", "-c", "id"]), None);
    }

    #[test]
    fn test_depth_bound() {
        // Three env layers: the shell sits at depth 3 and is still inspected.
        assert_eq!(
            shell(&["env", "env", "env", "sh", "-c", "id"]),
            Some("id".into())
        );
        // Four env layers push the shell past the bound.
        assert_eq!(shell(&["env", "env", "env", "env", "sh", "-c", "id"]), None);
    }

    #[test]
    fn test_direct_invocation() {
        assert_eq!(shell(&["git", "status"]), None);
        assert_eq!(shell(&[]), None);
        assert_eq!(shell(&["  ", "-c", "id"]), None);
    }
}
