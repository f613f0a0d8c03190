//! Command run request.

use crate::validate::normalize_raw_command;
use serde::Deserialize;
use serde_json::Value;

/// A proposed command run, as submitted by an agent.
///
/// Field values are kept as loose JSON so that malformed shapes (a string
/// instead of a list, numbers inside the list) are coerced the same way
/// regardless of transport. It must be resolved by
/// [`resolve_run_command`](crate::resolve_run_command) before use.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    /// The argv to execute. Anything other than a JSON array is treated as empty.
    #[serde(default)]
    pub command: Option<Value>,

    /// Optional display text shown to the approver.
    ///
    /// Ignored unless it is a string with non-whitespace content.
    #[serde(default)]
    pub raw_command: Option<Value>,
}

impl RunRequest {
    /// Create a request from an argv.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: Some(Value::Array(
                argv.into_iter().map(|s| Value::String(s.into())).collect(),
            )),
            raw_command: None,
        }
    }

    /// Set the display text.
    pub fn with_raw_command(mut self, raw_command: impl Into<String>) -> Self {
        self.raw_command = Some(Value::String(raw_command.into()));
        self
    }

    /// The argv, with every element coerced to a string.
    pub fn argv(&self) -> Vec<String> {
        match &self.command {
            Some(Value::Array(items)) => items.iter().map(coerce_arg).collect(),
            _ => Vec::new(),
        }
    }

    /// The trimmed display text, if it is a non-blank string.
    pub fn raw_command(&self) -> Option<String> {
        match &self.raw_command {
            Some(Value::String(raw)) => normalize_raw_command(Some(raw.as_str())),
            _ => None,
        }
    }
}

/// Render a JSON value the way a script runtime stringifies it.
///
/// Strings are taken verbatim. Numbers use the shortest round-trip form with
/// no trailing `.0`. Arrays join their elements with `,` (null elements render
/// empty). Objects render as `[object Object]`.
fn coerce_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_arg(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Shortest round-trip text for a finite float.
///
/// Positional notation for decimal exponents in `-7 < e < 21`, scientific
/// (`1e+21`, `1.5e-7`) outside it.
fn format_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let sign = if f < 0.0 { "-" } else { "" };

    // `{:e}` gives the shortest digits, e.g. `1.2345e-7`.
    let sci = format!("{:e}", f.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let exp_sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{exp_sign}{}", (n - 1).abs())
        } else {
            format!("{first}.{rest}e{exp_sign}{}", (n - 1).abs())
        }
    };

    format!("{sign}{body}")
}
