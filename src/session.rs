//! Per-line control flow: tokenize, substitute aliases, run builtins,
//! expand `~`, resolve redirection and hand the remaining stages to the executor.

use crate::aliases::{AliasStore, Aliases};
use crate::commands::builtins::cd::expand_home_words;
use crate::commands::{Builtin, BuiltinContext};
use crate::errors::{ShellError, ShellResult};
use crate::pipeline::{execute_pipeline, tokenize};
use crate::redirection::{resolve_redirection, Redirection};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What handling one line produced.
#[derive(Debug, Default)]
pub struct LineOutcome {
    /// Everything to report to the user, in the order it happened.
    pub errors: Vec<ShellError>,
    /// A `cd` ran, so the prompt must be recomputed.
    pub cwd_changed: bool,
}

/// State owned by one interactive session.
pub struct Session<S> {
    home: PathBuf,
    aliases: Aliases<S>,
}

impl<S: AliasStore> Session<S> {
    pub fn new(home: PathBuf, aliases: Aliases<S>) -> Self {
        Self { home, aliases }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn aliases(&self) -> &Aliases<S> {
        &self.aliases
    }

    /// Run one input line to completion. Builtin output goes to `out`;
    /// external processes write straight to the terminal or their file.
    pub fn handle_line(&mut self, line: &str, out: &mut dyn Write) -> LineOutcome {
        let mut outcome = LineOutcome::default();

        let stages = tokenize(line);
        if stages.is_empty() {
            return outcome;
        }
        if stages.iter().any(String::is_empty) {
            outcome.errors.push(ShellError::EmptyStage);
            return outcome;
        }

        let mut commands = Vec::with_capacity(stages.len());
        // One slot for the whole line: the last redirection seen wins and
        // applies to the final stage.
        let mut redirection: Option<Redirection> = None;

        for stage in &stages {
            let stage = self.aliases.resolve(stage).to_string();

            if let Some(builtin) = Builtin::parse(&stage) {
                debug!(builtin = builtin.name(), "running builtin");
                let mut ctx = BuiltinContext {
                    home: &self.home,
                    aliases: &mut self.aliases,
                    out: &mut *out,
                };
                if let Err(e) = builtin.execute(&mut ctx) {
                    outcome.errors.push(e);
                }
                outcome.cwd_changed |= builtin.changes_directory();
                continue;
            }

            let stage = expand_home_words(&stage, &self.home);
            match resolve_redirection(&stage) {
                Some(resolved) if resolved.is_redirection_only() => {
                    if let Err(e) = resolved.redirection.touch() {
                        outcome.errors.push(e);
                    }
                }
                Some(resolved) => {
                    redirection = Some(resolved.redirection);
                    commands.push(resolved.command);
                }
                None => commands.push(stage),
            }
        }

        if let Err(e) = run_commands(&commands, redirection.as_ref()) {
            outcome.errors.push(e);
        }
        outcome
    }
}

fn run_commands(commands: &[String], redirection: Option<&Redirection>) -> ShellResult<()> {
    if commands.is_empty() {
        return Ok(());
    }
    debug!(stages = commands.len(), "executing pipeline");
    execute_pipeline(commands, redirection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::{default_table, MemoryAliasStore};

    fn session() -> Session<MemoryAliasStore> {
        let aliases = Aliases::load(MemoryAliasStore::new(default_table())).unwrap();
        Session::new(PathBuf::from("/nonexistent-home"), aliases)
    }

    #[test]
    fn blank_line_does_nothing() {
        let mut out = Vec::new();
        let outcome = session().handle_line("   ", &mut out);
        assert!(outcome.errors.is_empty());
        assert!(!outcome.cwd_changed);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_stage_skips_the_line() {
        let mut out = Vec::new();
        let outcome = session().handle_line("alias | | alias", &mut out);
        assert!(matches!(outcome.errors.as_slice(), [ShellError::EmptyStage]));
        assert!(out.is_empty());
    }

    #[test]
    fn alias_builtin_defines_and_lists() {
        let mut session = session();
        let mut out = Vec::new();
        let outcome = session.handle_line("alias  gs=git   status", &mut out);
        assert!(outcome.errors.is_empty());
        assert_eq!(
            session.aliases().table().get("gs").map(String::as_str),
            Some("git status")
        );

        session.handle_line("alias", &mut out);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "gs -> git status\nll -> ls -la\n"
        );
    }

    #[test]
    fn builtin_errors_are_collected() {
        let mut out = Vec::new();
        let outcome = session().handle_line("alias broken", &mut out);
        assert!(matches!(outcome.errors.as_slice(), [ShellError::InvalidAlias(_)]));
    }

    #[test]
    fn failing_cd_still_marks_prompt_stale() {
        let mut out = Vec::new();
        let outcome = session().handle_line("cd /definitely/not/here", &mut out);
        assert!(outcome.cwd_changed);
        assert!(matches!(outcome.errors.as_slice(), [ShellError::InvalidDirectory { .. }]));
    }

    #[test]
    fn missing_command_is_reported() {
        let mut out = Vec::new();
        let outcome = session().handle_line("esh-no-such-command-here", &mut out);
        assert!(matches!(outcome.errors.as_slice(), [ShellError::CommandNotFound(_)]));
    }
}
