//! Combined command + environment guard.
//!
//! `ExecGuard` ties the command resolver and the environment sanitizer
//! together for the process-spawn layer. Build one with [`ExecGuard::builder`].

use crate::env_policy::HostEnvPolicy;
use crate::error::GuardError;
use crate::prepared::PreparedRun;
use crate::request::RunRequest;
use crate::resolve::resolve_run_command;
use std::collections::HashMap;

/// Guard for agent-requested command runs.
#[derive(Debug, Clone, Default)]
pub struct ExecGuard {
    env_policy: HostEnvPolicy,
}

impl ExecGuard {
    /// Create a new guard builder.
    pub fn builder() -> ExecGuardBuilder {
        ExecGuardBuilder::new()
    }

    /// The environment policy in effect.
    pub fn env_policy(&self) -> &HostEnvPolicy {
        &self.env_policy
    }

    /// Validate a request and sanitize its environment.
    ///
    /// This is the ONLY way to create a `PreparedRun`.
    ///
    /// # Errors
    ///
    /// Returns a [`GuardError`] if the request's display text cannot be
    /// reconciled with its argv.
    pub fn prepare(
        &self,
        request: &RunRequest,
        base_env: &HashMap<String, String>,
        overrides: Option<&HashMap<String, String>>,
    ) -> Result<PreparedRun, GuardError> {
        let command = resolve_run_command(request)?;
        let env = self.env_policy.sanitize(base_env, overrides);

        tracing::debug!(
            cmd_text = %command.cmd_text(),
            shell = command.shell_command().is_some(),
            env_keys = env.len(),
            "Prepared command run"
        );

        Ok(PreparedRun { command, env })
    }
}

/// Builder for `ExecGuard`.
#[derive(Debug, Clone, Default)]
pub struct ExecGuardBuilder {
    env_policy: HostEnvPolicy,
}

impl ExecGuardBuilder {
    /// Create a new builder with the built-in policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Never pass this key to a child (case-insensitive).
    pub fn block_env_key(mut self, key: impl AsRef<str>) -> Self {
        self.env_policy = self.env_policy.with_blocked_key(key);
        self
    }

    /// Never pass keys with this prefix to a child (case-insensitive).
    pub fn block_env_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.env_policy = self.env_policy.with_blocked_prefix(prefix);
        self
    }

    /// Allow this key to be inherited but never overridden (case-insensitive).
    pub fn block_override_key(mut self, key: impl AsRef<str>) -> Self {
        self.env_policy = self.env_policy.with_blocked_override_key(key);
        self
    }

    /// Build the guard.
    pub fn build(self) -> ExecGuard {
        ExecGuard {
            env_policy: self.env_policy,
        }
    }
}
