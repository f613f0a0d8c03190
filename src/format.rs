//! Display formatting for argv.
//!
//! Produces the canonical single-line text used when no wrapper carries an
//! inline command. This is for display and comparison only and is never fed
//! back into a shell.

/// Render an argv as one display string.
///
/// Each token is trimmed with [`trim_text`]. Empty tokens render as `""`;
/// tokens containing whitespace or `"` are double-quoted with inner quotes
/// backslash-escaped; everything else passes through unchanged.
pub fn format_exec_command<S: AsRef<str>>(argv: &[S]) -> String {
    argv.iter()
        .map(|arg| format_token(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace for display text and key trimming.
///
/// Unicode `White_Space` without U+0085 (NEL), plus U+FEFF (BOM). Display
/// texts produced by other tooling use this set, so comparisons only agree
/// byte for byte when both sides trim and quote the same characters.
pub(crate) fn is_text_whitespace(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{FEFF}' => true,
        c => c.is_whitespace(),
    }
}

/// Trim [`is_text_whitespace`] characters from both ends.
pub(crate) fn trim_text(s: &str) -> &str {
    s.trim_matches(is_text_whitespace)
}

fn format_token(arg: &str) -> String {
    let trimmed = trim_text(arg);
    if trimmed.is_empty() {
        return "\"\"".to_string();
    }
    let needs_quotes = trimmed.chars().any(|c| is_text_whitespace(c) || c == '"');
    if !needs_quotes {
        return trimmed.to_string();
    }
    format!("\"{}\"", trimmed.replace('"', "\\\""))
}
