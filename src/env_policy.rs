//! Host environment policy.
//!
//! Decides which environment variables a child process may receive. Inherited
//! variables are filtered against a blocklist of loader and shell hijack
//! vectors; caller overrides are held to a stricter standard, and can never
//! change `PATH`.

use crate::env_unwrap::is_portable_name;
use crate::format::trim_text;
use std::collections::{HashMap, HashSet};

/// Keys that are never passed to a child, whether inherited or overridden.
pub const BLOCKED_KEYS: &[&str] = &[
    // Interpreter code/module injection
    "NODE_OPTIONS",
    "NODE_PATH",
    "PYTHONHOME",
    "PYTHONPATH",
    "PERL5LIB",
    "PERL5OPT",
    "RUBYLIB",
    "RUBYOPT",
    // Shell startup and parsing
    "BASH_ENV",
    "ENV",
    "SHELL",
    "IFS",
    // libc / TLS
    "GCONV_PATH",
    "SSLKEYLOGFILE",
];

/// Key prefixes that are never passed to a child.
///
/// Covers dynamic loader injection (`LD_PRELOAD`, `DYLD_INSERT_LIBRARIES`) and
/// exported bash functions.
pub const BLOCKED_PREFIXES: &[&str] = &["DYLD_", "LD_", "BASH_FUNC_"];

/// Keys that may be inherited from the host but not set by a caller.
///
/// Redirecting these relocates shell startup files.
pub const BLOCKED_OVERRIDE_KEYS: &[&str] = &["HOME", "ZDOTDIR"];

/// Normalize an environment key.
///
/// Trims surrounding whitespace. Returns `None` for an empty key, or, when
/// `portable` is set, for a key outside `[A-Za-z_][A-Za-z0-9_]*`.
pub fn normalize_env_key(raw: &str, portable: bool) -> Option<String> {
    let key = trim_text(raw);
    if key.is_empty() {
        return None;
    }
    if portable && !is_portable_name(key) {
        return None;
    }
    Some(key.to_string())
}

/// Environment filtering rules.
///
/// The default policy uses the built-in lists. Extra entries can be added but
/// the built-ins can't be removed.
#[derive(Debug, Clone)]
pub struct HostEnvPolicy {
    /// Uppercased blocked keys.
    blocked_keys: HashSet<String>,
    /// Uppercased blocked prefixes.
    blocked_prefixes: Vec<String>,
    /// Uppercased override-only blocked keys.
    blocked_override_keys: HashSet<String>,
}

impl Default for HostEnvPolicy {
    fn default() -> Self {
        Self {
            blocked_keys: BLOCKED_KEYS.iter().map(|k| k.to_string()).collect(),
            blocked_prefixes: BLOCKED_PREFIXES.iter().map(|p| p.to_string()).collect(),
            blocked_override_keys: BLOCKED_OVERRIDE_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl HostEnvPolicy {
    /// Block an additional key (case-insensitive).
    pub fn with_blocked_key(mut self, key: impl AsRef<str>) -> Self {
        self.blocked_keys.insert(key.as_ref().trim().to_uppercase());
        self
    }

    /// Block an additional key prefix (case-insensitive).
    pub fn with_blocked_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        let prefix = prefix.as_ref().trim().to_uppercase();
        if !prefix.is_empty() && !self.blocked_prefixes.contains(&prefix) {
            self.blocked_prefixes.push(prefix);
        }
        self
    }

    /// Block an additional key for overrides only (case-insensitive).
    pub fn with_blocked_override_key(mut self, key: impl AsRef<str>) -> Self {
        self.blocked_override_keys
            .insert(key.as_ref().trim().to_uppercase());
        self
    }

    /// True if `name` must not be inherited by a child.
    pub fn is_dangerous(&self, name: &str) -> bool {
        let upper = name.to_uppercase();
        self.blocked_keys.contains(&upper)
            || self
                .blocked_prefixes
                .iter()
                .any(|prefix| upper.starts_with(prefix.as_str()))
    }

    /// True if `name` is in the override-only blocklist.
    ///
    /// Keys for which [`is_dangerous`](Self::is_dangerous) holds are rejected as
    /// overrides too; this only reports the additional override restrictions.
    pub fn is_dangerous_override(&self, name: &str) -> bool {
        self.blocked_override_keys.contains(&name.to_uppercase())
    }

    /// Produce the environment a child process may receive.
    ///
    /// 1. Inherited entries with a dangerous key are dropped.
    /// 2. Each override is kept only if its key is portable, is not `PATH`, and
    ///    is neither dangerous nor override-blocked.
    ///
    /// `PATH` therefore always reflects `base_env`, and is absent when
    /// `base_env` has none.
    ///
    /// When several raw keys trim to the same key, the one already in trimmed
    /// form wins; otherwise the last in byte order wins. The result never
    /// depends on map iteration order.
    pub fn sanitize(
        &self,
        base_env: &HashMap<String, String>,
        overrides: Option<&HashMap<String, String>>,
    ) -> HashMap<String, String> {
        let mut merged = HashMap::with_capacity(base_env.len());

        for (raw_key, value) in collision_order(base_env) {
            let Some(key) = normalize_env_key(raw_key, false) else {
                continue;
            };
            if self.is_dangerous(&key) {
                tracing::debug!(key = %key, "Dropping dangerous inherited variable");
                continue;
            }
            merged.insert(key, value.to_string());
        }

        let Some(overrides) = overrides else {
            return merged;
        };

        for (raw_key, value) in collision_order(overrides) {
            match self.check_override(raw_key) {
                Ok(key) => {
                    merged.insert(key, value.to_string());
                }
                Err(reason) => {
                    tracing::warn!(key = %raw_key, reason, "Dropping environment override");
                }
            }
        }

        merged
    }

    fn check_override(&self, raw_key: &str) -> Result<String, &'static str> {
        let key = normalize_env_key(raw_key, true).ok_or("non-portable name")?;
        if key.eq_ignore_ascii_case("PATH") {
            return Err("PATH is pinned to the host value");
        }
        if self.is_dangerous(&key) {
            return Err("dangerous variable");
        }
        if self.is_dangerous_override(&key) {
            return Err("not overridable");
        }
        Ok(key)
    }
}

/// Entries sorted so that later inserts win collisions: padded keys first,
/// then keys already in trimmed form, each group by raw key.
fn collision_order(env: &HashMap<String, String>) -> Vec<(&str, &str)> {
    let mut entries: Vec<(&str, &str)> = env
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    entries.sort_unstable_by_key(|&(key, _)| (trim_text(key) == key, key));
    entries
}

/// True if `name` is unsafe to inherit under the default policy.
pub fn is_dangerous_host_env_var(name: &str) -> bool {
    HostEnvPolicy::default().is_dangerous(name)
}

/// True if `name` is in the default override-only blocklist (`HOME`, `ZDOTDIR`).
pub fn is_dangerous_host_env_override(name: &str) -> bool {
    HostEnvPolicy::default().is_dangerous_override(name)
}

/// Sanitize with the default policy. See [`HostEnvPolicy::sanitize`].
pub fn sanitize_host_env(
    base_env: &HashMap<String, String>,
    overrides: Option<&HashMap<String, String>>,
) -> HashMap<String, String> {
    HostEnvPolicy::default().sanitize(base_env, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_dangerous_keys_case_insensitive() {
        assert!(is_dangerous_host_env_var("BASH_ENV"));
        assert!(is_dangerous_host_env_var("bash_env"));
        assert!(is_dangerous_host_env_var("SHELL"));
        assert!(is_dangerous_host_env_var("DYLD_INSERT_LIBRARIES"));
        assert!(is_dangerous_host_env_var("ld_preload"));
        assert!(is_dangerous_host_env_var("BASH_FUNC_echo%%"));
        assert!(!is_dangerous_host_env_var("PATH"));
        assert!(!is_dangerous_host_env_var("FOO"));
        assert!(!is_dangerous_host_env_var("HOME"));
    }

    #[test]
    fn test_override_only_keys() {
        assert!(is_dangerous_host_env_override("HOME"));
        assert!(is_dangerous_host_env_override("zdotdir"));
        assert!(!is_dangerous_host_env_override("BASH_ENV"));
        assert!(!is_dangerous_host_env_override("FOO"));
    }

    #[test]
    fn test_normalize_env_key() {
        assert_eq!(
            normalize_env_key(" OPENROUTER_API_KEY ", false).as_deref(),
            Some("OPENROUTER_API_KEY")
        );
        assert_eq!(normalize_env_key("NOT-PORTABLE", true), None);
        assert_eq!(
            normalize_env_key(" BASH_FUNC_echo%% ", false).as_deref(),
            Some("BASH_FUNC_echo%%")
        );
        assert_eq!(normalize_env_key("   ", false), None);
        assert_eq!(normalize_env_key("9LIVES", true), None);
        assert_eq!(
            normalize_env_key("\u{FEFF}LANG", true).as_deref(),
            Some("LANG")
        );
    }

    #[test]
    fn test_removes_dangerous_inherited_keys() {
        let result = sanitize_host_env(
            &env(&[
                ("PATH", "/usr/bin:/bin"),
                ("BASH_ENV", "/tmp/pwn.sh"),
                ("LD_PRELOAD", "/tmp/pwn.so"),
                ("OK", "1"),
            ]),
            None,
        );

        assert_eq!(result, env(&[("PATH", "/usr/bin:/bin"), ("OK", "1")]));
    }

    #[test]
    fn test_blocks_path_and_dangerous_overrides() {
        let result = sanitize_host_env(
            &env(&[
                ("PATH", "/usr/bin:/bin"),
                ("HOME", "/tmp/trusted-home"),
                ("ZDOTDIR", "/tmp/trusted-zdotdir"),
            ]),
            Some(&env(&[
                ("PATH", "/tmp/evil"),
                ("HOME", "/tmp/evil-home"),
                ("ZDOTDIR", "/tmp/evil-zdotdir"),
                ("BASH_ENV", "/tmp/pwn.sh"),
                ("SAFE", "ok"),
            ])),
        );

        assert_eq!(result.get("PATH").map(String::as_str), Some("/usr/bin:/bin"));
        assert!(!result.contains_key("BASH_ENV"));
        assert_eq!(result.get("SAFE").map(String::as_str), Some("ok"));
        assert_eq!(result.get("HOME").map(String::as_str), Some("/tmp/trusted-home"));
        assert_eq!(
            result.get("ZDOTDIR").map(String::as_str),
            Some("/tmp/trusted-zdotdir")
        );
    }

    #[test]
    fn test_path_override_rejected_without_base_path() {
        let result = sanitize_host_env(
            &env(&[("USER", "me")]),
            Some(&env(&[("PATH", "/tmp/evil"), ("path", "/tmp/evil")])),
        );
        assert!(!result.contains_key("PATH"));
        assert!(!result.contains_key("path"));
        assert_eq!(result, env(&[("USER", "me")]));
    }

    #[test]
    fn test_drops_non_portable_override_keys() {
        let result = sanitize_host_env(
            &env(&[("PATH", "/usr/bin:/bin")]),
            Some(&env(&[
                (" BAD KEY", "x"),
                ("NOT-PORTABLE", "x"),
                ("GOOD_KEY", "ok"),
            ])),
        );

        assert_eq!(result.get("GOOD_KEY").map(String::as_str), Some("ok"));
        assert!(!result.contains_key(" BAD KEY"));
        assert!(!result.contains_key("BAD KEY"));
        assert!(!result.contains_key("NOT-PORTABLE"));
    }

    #[test]
    fn test_non_portable_inherited_keys_kept_unless_dangerous() {
        let result = sanitize_host_env(
            &env(&[("ProgramFiles(x86)", "C:\\x"), ("BASH_FUNC_ls%%", "() { id; }")]),
            None,
        );
        assert_eq!(result, env(&[("ProgramFiles(x86)", "C:\\x")]));
    }

    #[test]
    fn test_override_replaces_inherited_value() {
        let result = sanitize_host_env(
            &env(&[("LANG", "C")]),
            Some(&env(&[(" LANG ", "en_US.UTF-8")])),
        );
        assert_eq!(result, env(&[("LANG", "en_US.UTF-8")]));
    }

    #[test]
    fn test_override_key_collision_is_stable() {
        let overrides = env(&[("LANG", "a"), (" LANG ", "b"), ("LANG\t", "c")]);
        for _ in 0..64 {
            // Fresh maps get fresh hash seeds, so iteration order varies.
            let overrides: HashMap<String, String> = overrides.clone().into_iter().collect();
            let result = sanitize_host_env(&HashMap::new(), Some(&overrides));
            assert_eq!(result, env(&[("LANG", "a")]));
        }
    }

    #[test]
    fn test_padded_override_aliases_resolve_by_key_order() {
        let result = sanitize_host_env(
            &HashMap::new(),
            Some(&env(&[(" LANG", "x"), ("LANG ", "y")])),
        );
        // " LANG" < "LANG " in byte order, so the later one wins.
        assert_eq!(result, env(&[("LANG", "y")]));
    }

    #[test]
    fn test_inherited_path_collision_keeps_exact_key() {
        let base = env(&[("PATH", "/usr/bin"), ("PATH ", "/tmp/evil"), (" PATH", "/tmp/evil")]);
        for _ in 0..64 {
            let base: HashMap<String, String> = base.clone().into_iter().collect();
            let result = sanitize_host_env(&base, Some(&env(&[("PATH", "/tmp/evil")])));
            assert_eq!(result, env(&[("PATH", "/usr/bin")]));
        }
    }

    #[test]
    fn test_custom_policy_extends_builtins() {
        let policy = HostEnvPolicy::default()
            .with_blocked_key("git_ssh_command")
            .with_blocked_prefix("npm_config_")
            .with_blocked_override_key("TMPDIR");

        assert!(policy.is_dangerous("GIT_SSH_COMMAND"));
        assert!(policy.is_dangerous("NPM_CONFIG_PREFIX"));
        assert!(policy.is_dangerous("LD_PRELOAD"));
        assert!(policy.is_dangerous_override("tmpdir"));

        let result = policy.sanitize(
            &env(&[("TMPDIR", "/tmp"), ("GIT_SSH_COMMAND", "evil")]),
            Some(&env(&[("TMPDIR", "/evil")])),
        );
        assert_eq!(result, env(&[("TMPDIR", "/tmp")]));
    }
}
