pub mod aliases;
pub mod cli;
pub mod commands;
pub mod completion;
pub mod errors;
pub mod pipeline;
pub mod prompt;
pub mod redirection;
pub mod repl;
pub mod session;
pub mod terminal;

use aliases::{Aliases, JsonAliasStore};
use anyhow::{anyhow, Context};
use cli::ShellArgs;
use repl::{Repl, SessionEnd};
use session::Session;
use std::io;
use terminal::Terminal;
use tracing::info;

/// Set up the session and run the REPL until it ends.
///
/// Errors returned here are fatal startup errors.
pub fn run_shell(args: &ShellArgs) -> anyhow::Result<SessionEnd> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;

    let store = match &args.alias_file {
        Some(path) => JsonAliasStore::new(path),
        None => JsonAliasStore::in_home(&home),
    };
    store.ensure_exists().context("failed to create alias file")?;
    let aliases = Aliases::load(store).context("failed to load aliases")?;
    info!(home = %home.display(), count = aliases.table().len(), "aliases loaded");

    let terminal = Terminal::capture(io::stdin()).context("standard input is not a terminal")?;
    let repl = Repl::new(Session::new(home, aliases), terminal)?;
    repl.run().context("failed to enter raw mode")
}
