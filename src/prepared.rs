//! Prepared run ready to hand to a process-spawn layer.
//!
//! `PreparedRun` can only be created by `ExecGuard::prepare()`, so anything
//! holding one has passed both the display-text check and env sanitization.

use crate::resolve::ResolvedCommand;
use std::collections::HashMap;
use std::process::Command;

/// A validated command plus the environment it may run with.
///
/// This type cannot be constructed outside of `exec_guard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRun {
    pub(crate) command: ResolvedCommand,
    pub(crate) env: HashMap<String, String>,
}

impl PreparedRun {
    /// The argv that will execute.
    pub fn argv(&self) -> &[String] {
        self.command.argv()
    }

    /// The text to show an approver.
    pub fn cmd_text(&self) -> &str {
        self.command.cmd_text()
    }

    /// Shell text, set only for recognized wrapper invocations.
    pub fn shell_command(&self) -> Option<&str> {
        self.command.shell_command()
    }

    /// The caller's display text, trimmed, if one was supplied.
    pub fn raw_command(&self) -> Option<&str> {
        self.command.raw_command()
    }

    /// The sanitized child environment.
    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// The resolved command description.
    pub fn resolved(&self) -> &ResolvedCommand {
        &self.command
    }

    /// Build a [`Command`] with a cleared environment populated only from
    /// [`env`](Self::env). Nothing is spawned.
    ///
    /// Returns `None` when the argv is empty.
    pub fn to_command(&self) -> Option<Command> {
        let (program, args) = self.command.argv().split_first()?;
        let mut cmd = Command::new(program);
        cmd.args(args).env_clear().envs(&self.env);
        Some(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RunRequest;
    use crate::resolve::resolve_run_command;
    use std::ffi::OsStr;

    fn prepared(argv: &[&str], env: &[(&str, &str)]) -> PreparedRun {
        PreparedRun {
            command: resolve_run_command(&RunRequest::new(argv.iter().copied())).unwrap(),
            env: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_to_command_uses_only_sanitized_env() {
        let run = prepared(&["/bin/echo", "hi"], &[("LANG", "C")]);
        let cmd = run.to_command().unwrap();

        assert_eq!(cmd.get_program(), OsStr::new("/bin/echo"));
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), vec![OsStr::new("hi")]);

        let envs: Vec<_> = cmd.get_envs().collect();
        assert_eq!(envs, vec![(OsStr::new("LANG"), Some(OsStr::new("C")))]);
    }

    #[test]
    fn test_empty_argv_has_no_command() {
        let run = prepared(&[], &[]);
        assert!(run.to_command().is_none());
        assert_eq!(run.cmd_text(), "");
    }
}
