//! `env` invocation unwrapping.
//!
//! Scans the options and `NAME=value` assignments of an `env` command line to
//! find where the wrapped command starts. A flag this scanner does not know
//! aborts the scan: skipping it could hide the real target command.

/// `env` flags that take no value.
pub const ENV_FLAGS: &[&str] = &["-i", "--ignore-environment", "-0", "--null"];

/// `env` options that take a value, either as the next token or fused via `=`.
pub const ENV_OPTIONS_WITH_VALUE: &[&str] = &[
    "-u",
    "--unset",
    "-c",
    "--chdir",
    "-s",
    "--split-string",
    "--default-signal",
    "--ignore-signal",
    "--block-signal",
];

/// Short options whose value may be fused directly (`-uNAME`, `-C/tmp`, `-S...`).
const FUSED_SHORT_PREFIXES: &[&str] = &["-u", "-c", "-s"];

/// Classification of a single `env` argument while scanning options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvToken {
    /// Whitespace-only token, ignored.
    Blank,
    /// `--` or `-`: the next token starts the wrapped command.
    Terminator,
    /// `NAME=value`
    Assignment,
    /// A recognized option that consumes only itself.
    Flag,
    /// A recognized option whose value is the next token.
    OptionNeedsValue,
    /// An option-looking token that is not recognized.
    Unknown,
    /// First token of the wrapped command.
    Command,
}

/// Classify one `env` argument.
///
/// # Rules
///
/// - `--` and lone `-` terminate option scanning
/// - `NAME=value` with a portable name is an assignment
/// - Known flags and options match case-insensitively; `--opt=value` and fused
///   short forms carry their value inline
/// - Any other token starting with `-` is unknown
/// - Everything else starts the wrapped command
pub fn classify_env_token(token: &str) -> EnvToken {
    let token = token.trim();
    if token.is_empty() {
        return EnvToken::Blank;
    }
    if token == "--" || token == "-" {
        return EnvToken::Terminator;
    }
    if is_env_assignment(token) {
        return EnvToken::Assignment;
    }
    if !token.starts_with('-') {
        return EnvToken::Command;
    }

    let lower = token.to_ascii_lowercase();
    let (flag, fused_value) = match lower.split_once('=') {
        Some((flag, _)) => (flag, true),
        None => (lower.as_str(), false),
    };

    if ENV_FLAGS.contains(&flag) {
        return EnvToken::Flag;
    }
    if ENV_OPTIONS_WITH_VALUE.contains(&flag) {
        return if fused_value {
            EnvToken::Flag
        } else {
            EnvToken::OptionNeedsValue
        };
    }
    if FUSED_SHORT_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return EnvToken::Flag;
    }

    EnvToken::Unknown
}

/// Return the wrapped command of an `env` argv (`argv[0]` is `env` itself).
///
/// Returns `None` when no command follows the options, or when an unknown
/// option is encountered.
pub fn unwrap_env_invocation(argv: &[String]) -> Option<&[String]> {
    let mut idx = 1;
    let mut expects_option_value = false;

    while idx < argv.len() {
        let token = classify_env_token(&argv[idx]);
        if token == EnvToken::Blank {
            idx += 1;
            continue;
        }
        if expects_option_value {
            expects_option_value = false;
            idx += 1;
            continue;
        }

        match token {
            EnvToken::Terminator => {
                idx += 1;
                break;
            }
            EnvToken::Assignment | EnvToken::Flag => idx += 1,
            EnvToken::OptionNeedsValue => {
                expects_option_value = true;
                idx += 1;
            }
            EnvToken::Unknown => {
                tracing::debug!(token = %argv[idx], "Unrecognized env option, not unwrapping");
                return None;
            }
            EnvToken::Command | EnvToken::Blank => break,
        }
    }

    if idx < argv.len() {
        Some(&argv[idx..])
    } else {
        None
    }
}

/// `NAME=value` where NAME is a portable identifier.
fn is_env_assignment(token: &str) -> bool {
    match token.split_once('=') {
        Some((name, _)) => is_portable_name(name),
        None => false,
    }
}

pub(crate) fn is_portable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
