use crate::aliases::AliasStore;
use crate::completion::{TabCompletion, TabState};
use crate::errors::{ShellError, ShellResult};
use crate::prompt::current_prompt;
use crate::session::Session;
use crate::terminal::Terminal;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, EventHandler, KeyCode, KeyEvent, Modifiers};
use std::io;
use std::os::fd::AsFd;
use tracing::{debug, info, warn};

/// How the interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed `exit`.
    Exit,
    /// The input stream closed.
    EndOfInput,
}

impl SessionEnd {
    pub fn exit_code(self) -> u8 {
        match self {
            SessionEnd::Exit => 0,
            SessionEnd::EndOfInput => 1,
        }
    }
}

/// Whether a line asks to leave the session.
pub fn is_exit(line: &str) -> bool {
    line.trim() == "exit"
}

/// Drives the read loop over a raw-mode terminal.
pub struct Repl<S, F: AsFd> {
    editor: DefaultEditor,
    session: Session<S>,
    terminal: Terminal<F>,
    tab: TabState,
    prompt: String,
}

impl<S: AliasStore, F: AsFd> Repl<S, F> {
    pub fn new(session: Session<S>, terminal: Terminal<F>) -> ShellResult<Self> {
        let config = Config::builder().auto_add_history(true).build();

        let mut editor = DefaultEditor::with_config(config).map_err(|e| {
            ShellError::InputError(format!("Failed to create readline editor: {}", e))
        })?;

        let tab = TabState::default();
        editor.bind_sequence(
            KeyEvent(KeyCode::Tab, Modifiers::NONE),
            EventHandler::Conditional(Box::new(TabCompletion::new(tab.clone()))),
        );

        let prompt = current_prompt(session.home());
        Ok(Self {
            editor,
            session,
            terminal,
            tab,
            prompt,
        })
    }

    /// Enter raw mode and read lines until `exit` or end of input.
    ///
    /// The terminal is restored before returning; should this frame unwind
    /// instead, dropping the guard restores it.
    pub fn run(mut self) -> ShellResult<SessionEnd> {
        self.terminal.enter_raw()?;
        info!("session started");

        let end = loop {
            match self.editor.readline(&self.prompt) {
                Ok(line) if is_exit(&line) => break SessionEnd::Exit,
                Ok(line) => self.handle_line(&line),
                Err(ReadlineError::Eof) => break SessionEnd::EndOfInput,
                Err(ReadlineError::Interrupted) => debug!("line interrupted"),
                Err(e) => warn!(error = %e, "failed to read line"),
            }
        };

        if let Err(e) = self.terminal.restore() {
            warn!(error = %e, "failed to restore terminal attributes");
        }
        info!(?end, tab_presses = self.tab.presses(), "session ended");
        Ok(end)
    }

    fn handle_line(&mut self, line: &str) {
        let mut stdout = io::stdout();
        let outcome = self.session.handle_line(line, &mut stdout);
        for e in &outcome.errors {
            eprintln!("{}", e);
        }
        if outcome.cwd_changed {
            self.prompt = current_prompt(self.session.home());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(SessionEnd::Exit.exit_code(), 0);
        assert_eq!(SessionEnd::EndOfInput.exit_code(), 1);
    }

    #[test]
    fn only_the_bare_word_exits() {
        assert!(is_exit("exit"));
        assert!(is_exit("  exit \n"));
        assert!(!is_exit("exit 0"));
        assert!(!is_exit("exiting"));
    }
}
