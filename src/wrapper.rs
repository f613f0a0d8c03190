//! Wrapper executable detection.
//!
//! A wrapper is an executable that runs another command described in its own
//! arguments: `env`, a POSIX shell, `cmd.exe`, or PowerShell. Detection looks only
//! at the lowercase base name of `argv[0]`.

/// POSIX shell interpreters that accept an inline command via `-c`.
pub const POSIX_SHELLS: &[&str] = &["ash", "bash", "dash", "fish", "ksh", "sh", "zsh"];

/// Windows command processor names.
pub const WINDOWS_CMD: &[&str] = &["cmd", "cmd.exe"];

/// PowerShell executable names.
pub const POWERSHELL: &[&str] = &["powershell", "powershell.exe", "pwsh", "pwsh.exe"];

/// Recognized interpreter family of `argv[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    /// `env [OPTION]... [NAME=VALUE]... COMMAND`
    Env,
    /// `sh`, `bash`, `zsh`, ...
    PosixShell,
    /// `cmd` / `cmd.exe`
    WindowsCmd,
    /// `powershell` / `pwsh`
    PowerShell,
}

impl WrapperKind {
    /// Classify an executable token, or `None` for a direct invocation.
    pub fn detect(token: &str) -> Option<WrapperKind> {
        let base = executable_base_name(token);
        let base = base.as_str();

        if base == "env" {
            Some(WrapperKind::Env)
        } else if POSIX_SHELLS.contains(&base) {
            Some(WrapperKind::PosixShell)
        } else if WINDOWS_CMD.contains(&base) {
            Some(WrapperKind::WindowsCmd)
        } else if POWERSHELL.contains(&base) {
            Some(WrapperKind::PowerShell)
        } else {
            None
        }
    }
}

impl std::fmt::Display for WrapperKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WrapperKind::Env => write!(f, "env"),
            WrapperKind::PosixShell => write!(f, "posix-shell"),
            WrapperKind::WindowsCmd => write!(f, "cmd"),
            WrapperKind::PowerShell => write!(f, "powershell"),
        }
    }
}

/// Lowercase base name of an executable token.
///
/// The token is stripped under both POSIX (`/`) and Windows (`\`, `/`, drive
/// prefix) conventions and the shorter result wins, so a wrapper name cannot
/// hide behind whichever separator style the other convention ignores.
pub fn executable_base_name(token: &str) -> String {
    let token = token.trim();
    let posix = posix_base_name(token);
    let windows = windows_base_name(token);
    let base = if windows.len() < posix.len() {
        windows
    } else {
        posix
    };
    base.trim().to_lowercase()
}

fn posix_base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

fn windows_base_name(path: &str) -> &str {
    let bytes = path.as_bytes();
    let path = if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        &path[2..]
    } else {
        path
    };
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
