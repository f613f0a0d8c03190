//! # exec_guard
//!
//! Command execution guard for agentic systems.
//!
//! `exec_guard` sits between "a command an agent wants to run" and "a command
//! the host actually executes". It defends against two attack classes:
//!
//! - **Approval bypass**: the text shown to an approver differs from what will
//!   run. Wrapper invocations (`env`, POSIX shells, `cmd.exe`, PowerShell) are
//!   unwrapped to find the effective command, and any mismatch is rejected.
//! - **Environment-based escalation**: inherited or injected variables such as
//!   `LD_PRELOAD`, `BASH_ENV` or a redirected `PATH`/`HOME` hijack the child.
//!   The environment is sanitized before it reaches the child.
//!
//! ## Quick Start
//!
//! ```rust
//! use exec_guard::{ExecGuard, RunRequest};
//! use std::collections::HashMap;
//!
//! let guard = ExecGuard::builder()
//!     .block_env_prefix("AWS_")
//!     .build();
//!
//! let request = RunRequest::new(["bash", "-lc", "cargo test"])
//!     .with_raw_command("cargo test");
//!
//! let base_env = HashMap::from([
//!     ("PATH".to_string(), "/usr/bin:/bin".to_string()),
//!     ("LD_PRELOAD".to_string(), "/tmp/evil.so".to_string()),
//! ]);
//!
//! let run = guard.prepare(&request, &base_env, None).expect("consistent request");
//! assert_eq!(run.cmd_text(), "cargo test");
//! assert!(!run.env().contains_key("LD_PRELOAD"));
//! ```
//!
//! ## Design Principles
//!
//! - **No execution**: everything here is a pure check over its inputs
//! - **Provable display text**: the approver's text must be derivable from argv
//! - **Drop, don't fail**: suspicious env entries are silently excluded
//! - **Fail closed on ambiguity**: an unknown `env` flag stops unwrapping

mod env_policy;
mod env_unwrap;
mod error;
mod format;
mod guard;
mod inline;
mod platform;
mod prepared;
mod request;
mod resolve;
mod validate;
mod wrapper;

// Public API
pub use env_policy::{
    is_dangerous_host_env_override, is_dangerous_host_env_var, normalize_env_key,
    sanitize_host_env, HostEnvPolicy, BLOCKED_KEYS, BLOCKED_OVERRIDE_KEYS, BLOCKED_PREFIXES,
};
pub use env_unwrap::{classify_env_token, unwrap_env_invocation, EnvToken};
pub use error::{GuardError, Rejection, RejectionCode};
pub use format::format_exec_command;
pub use guard::{ExecGuard, ExecGuardBuilder};
pub use inline::{extract_inline_command, extract_shell_command, InlineCommand, MAX_UNWRAP_DEPTH};
pub use platform::{
    is_truthy_env_value, is_wsl2_kernel_version, AutoSelectFamilyDecision,
    NetworkFamilyResolver, Wsl2Cache, DISABLE_AUTO_SELECT_FAMILY_ENV,
    ENABLE_AUTO_SELECT_FAMILY_ENV,
};
pub use prepared::PreparedRun;
pub use request::RunRequest;
pub use resolve::{resolve_run_command, ResolvedCommand};
pub use validate::{normalize_raw_command, validate_command_consistency, ValidatedCommand};
pub use wrapper::{executable_base_name, WrapperKind, POSIX_SHELLS, POWERSHELL, WINDOWS_CMD};
