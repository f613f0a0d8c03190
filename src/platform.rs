//! Platform detection for network family selection.
//!
//! WSL2 has unreliable IPv6 connectivity, so clients that would otherwise race
//! IPv4/IPv6 ("auto select family") should pin IPv4 there. Detection reads a
//! kernel file, so the result is memoized in an explicit [`Wsl2Cache`] owned by
//! the resolver instead of a process-wide static.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Forces auto family selection on when truthy.
pub const ENABLE_AUTO_SELECT_FAMILY_ENV: &str = "EXEC_GUARD_ENABLE_AUTO_SELECT_FAMILY";

/// Forces auto family selection off when truthy.
pub const DISABLE_AUTO_SELECT_FAMILY_ENV: &str = "EXEC_GUARD_DISABLE_AUTO_SELECT_FAMILY";

/// Kernel version file inspected for WSL markers.
pub const DEFAULT_KERNEL_VERSION_PATH: &str = "/proc/version";

/// Runtime major version from which auto family selection is enabled by default.
pub const AUTO_SELECT_MIN_RUNTIME_MAJOR: u32 = 22;

/// Memoized WSL2 detection.
///
/// The probe runs at most once until [`reset`](Self::reset) is called.
/// Concurrent callers block on the same lock, so only one of them probes.
#[derive(Debug)]
pub struct Wsl2Cache {
    probe_path: PathBuf,
    cached: Mutex<Option<bool>>,
}

impl Default for Wsl2Cache {
    fn default() -> Self {
        Self::with_probe_path(DEFAULT_KERNEL_VERSION_PATH)
    }
}

impl Wsl2Cache {
    /// Create a cache that probes the given kernel version file.
    pub fn with_probe_path(path: impl Into<PathBuf>) -> Self {
        Self {
            probe_path: path.into(),
            cached: Mutex::new(None),
        }
    }

    /// Return the cached result, probing on first use.
    pub fn get_or_probe(&self) -> bool {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(is_wsl2) = *cached {
            return is_wsl2;
        }
        let is_wsl2 = self.probe();
        tracing::debug!(is_wsl2, path = %self.probe_path.display(), "Probed for WSL2");
        *cached = Some(is_wsl2);
        is_wsl2
    }

    /// Forget the cached result.
    pub fn reset(&self) {
        *self.cached.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn probe(&self) -> bool {
        match std::fs::read_to_string(&self.probe_path) {
            Ok(version) => is_wsl2_kernel_version(&version),
            Err(_) => false,
        }
    }
}

/// True if a kernel version string identifies a WSL2 kernel.
pub fn is_wsl2_kernel_version(version: &str) -> bool {
    let lower = version.to_lowercase();
    lower.contains("wsl2") || lower.contains("microsoft-standard")
}

/// `1`, `true`, `yes`, `on` (trimmed, case-insensitive).
pub fn is_truthy_env_value(value: Option<&str>) -> bool {
    match value {
        Some(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => false,
    }
}

/// Outcome of [`NetworkFamilyResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutoSelectFamilyDecision {
    /// `None` leaves the client default untouched.
    pub value: Option<bool>,
    /// What produced the value, e.g. `config` or `default-wsl2`.
    pub source: Option<String>,
}

impl AutoSelectFamilyDecision {
    fn new(value: bool, source: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            source: Some(source.into()),
        }
    }
}

/// Decides whether clients should enable auto IPv4/IPv6 family selection.
#[derive(Debug, Default)]
pub struct NetworkFamilyResolver {
    wsl2: Wsl2Cache,
}

impl NetworkFamilyResolver {
    /// Create a resolver with its own WSL2 cache.
    pub fn new(wsl2: Wsl2Cache) -> Self {
        Self { wsl2 }
    }

    /// Resolve the decision.
    ///
    /// Precedence: enable env var, disable env var, explicit config, WSL2
    /// detection, then `runtime_major >= 22`.
    pub fn resolve(
        &self,
        env: &HashMap<String, String>,
        configured: Option<bool>,
        runtime_major: Option<u32>,
    ) -> AutoSelectFamilyDecision {
        let env_flag = |name: &str| is_truthy_env_value(env.get(name).map(String::as_str));

        if env_flag(ENABLE_AUTO_SELECT_FAMILY_ENV) {
            return AutoSelectFamilyDecision::new(
                true,
                format!("env:{ENABLE_AUTO_SELECT_FAMILY_ENV}"),
            );
        }
        if env_flag(DISABLE_AUTO_SELECT_FAMILY_ENV) {
            return AutoSelectFamilyDecision::new(
                false,
                format!("env:{DISABLE_AUTO_SELECT_FAMILY_ENV}"),
            );
        }
        if let Some(value) = configured {
            return AutoSelectFamilyDecision::new(value, "config");
        }
        if self.wsl2.get_or_probe() {
            return AutoSelectFamilyDecision::new(false, "default-wsl2");
        }
        if runtime_major.is_some_and(|major| major >= AUTO_SELECT_MIN_RUNTIME_MAJOR) {
            return AutoSelectFamilyDecision::new(true, "default-runtime");
        }
        AutoSelectFamilyDecision::default()
    }

    /// Clear the memoized platform detection.
    pub fn reset(&self) {
        self.wsl2.reset();
    }
}
