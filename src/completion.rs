use rustyline::{Cmd, ConditionalEventHandler, Event, EventContext, Movement, RepeatCount};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Session-wide count of Tab presses on a non-empty line.
///
/// Never reset: once it passes one, every later qualifying Tab completes.
#[derive(Debug, Clone, Default)]
pub struct TabState {
    presses: Arc<AtomicUsize>,
}

impl TabState {
    /// Count one press and return the new total.
    pub fn record_press(&self) -> usize {
        self.presses.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn presses(&self) -> usize {
        self.presses.load(Ordering::SeqCst)
    }
}

/// What a Tab press does to the line being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabAction {
    /// First press of the session: move the display down a line, nothing else.
    Prime,
    /// Exactly one match: the line with the prefix replaced.
    Complete(String),
    /// Zero or several matches: show them, keep the line.
    List(Vec<String>),
}

/// Tab key hook completing the second word of the line against the
/// entries of the working directory.
#[derive(Debug, Clone)]
pub struct TabCompletion {
    state: TabState,
}

impl TabCompletion {
    pub fn new(state: TabState) -> Self {
        Self { state }
    }

    /// Decide what a Tab press on `line` does, listing `dir` when completing.
    /// Returns `None` for an empty line; such presses are not counted.
    pub fn on_tab(&self, line: &str, dir: &Path) -> Option<TabAction> {
        if line.is_empty() {
            return None;
        }
        if self.state.record_press() == 1 {
            return Some(TabAction::Prime);
        }

        let prefix = line.split_whitespace().nth(1).unwrap_or("");
        let mut matches = matching_entries(dir, prefix);
        debug!(prefix, count = matches.len(), "tab completion");

        if matches.len() == 1 {
            let completion = matches.remove(0);
            Some(TabAction::Complete(splice_second_word(line, &completion)))
        } else {
            Some(TabAction::List(matches))
        }
    }
}

/// Names in `dir` starting with `prefix`, sorted.
pub fn matching_entries(dir: &Path, prefix: &str) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list directory");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(prefix))
        .collect();
    names.sort();
    names
}

/// Put `completion` in place of the second word, appending it when the
/// line has only one word.
fn splice_second_word(line: &str, completion: &str) -> String {
    let mut offset = 0;
    let mut words = Vec::new();
    for word in line.split_whitespace() {
        let start = offset + line[offset..].find(word).unwrap_or(0);
        offset = start + word.len();
        words.push(start..offset);
        if words.len() == 2 {
            break;
        }
    }

    match words.get(1) {
        Some(range) => format!("{}{}{}", &line[..range.start], completion, &line[range.end..]),
        None if line.ends_with(char::is_whitespace) => format!("{}{}", line, completion),
        None => format!("{} {}", line, completion),
    }
}

fn show(text: &str) {
    let mut out = io::stdout().lock();
    if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        warn!(error = %e, "failed to write completion output");
    }
}

impl ConditionalEventHandler for TabCompletion {
    fn handle(&self, _evt: &Event, _n: RepeatCount, _positive: bool, ctx: &EventContext) -> Option<Cmd> {
        let dir = match env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!(error = %e, "cannot resolve working directory");
                return Some(Cmd::Noop);
            }
        };

        match self.on_tab(ctx.line(), &dir)? {
            TabAction::Prime => {
                show("\r\n");
                Some(Cmd::Repaint)
            }
            TabAction::Complete(line) => Some(Cmd::Replace(Movement::WholeLine, Some(line))),
            TabAction::List(matches) => {
                show(&format!("\r\n{}\r\n", matches.join("\t")));
                Some(Cmd::Repaint)
            }
        }
    }
}
