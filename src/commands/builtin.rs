use crate::aliases::{AliasStore, Aliases};
use crate::commands::builtins;
use crate::errors::ShellResult;
use std::io::Write;
use std::path::Path;

/// Commands that run inside the shell because they change its own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin<'a> {
    /// `cd [path]`
    Cd(Option<&'a str>),
    /// `alias [key=value]`
    Alias(Option<&'a str>),
}

/// Shell state a builtin may touch.
pub struct BuiltinContext<'a, S> {
    pub home: &'a Path,
    pub aliases: &'a mut Aliases<S>,
    pub out: &'a mut dyn Write,
}

impl<'a> Builtin<'a> {
    /// Match the first word of a normalized stage against the builtin names.
    pub fn parse(stage: &'a str) -> Option<Self> {
        let (name, rest) = match stage.split_once(' ') {
            Some((name, rest)) => (name, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (stage, None),
        };
        match name {
            "cd" => Some(Builtin::Cd(rest)),
            "alias" => Some(Builtin::Alias(rest)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Cd(_) => "cd",
            Builtin::Alias(_) => "alias",
        }
    }

    /// Whether running this builtin can move the working directory.
    pub fn changes_directory(&self) -> bool {
        matches!(self, Builtin::Cd(_))
    }

    pub fn execute<S: AliasStore>(self, ctx: &mut BuiltinContext<'_, S>) -> ShellResult<()> {
        match self {
            Builtin::Cd(path) => builtins::cd::change_directory(path, ctx.home).map(drop),
            Builtin::Alias(None) => builtins::alias::list(ctx.aliases, &mut *ctx.out),
            Builtin::Alias(Some(definition)) => builtins::alias::define(ctx.aliases, definition),
        }
    }
}
