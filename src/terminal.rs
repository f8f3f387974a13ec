//! Terminal attribute control for the interactive session.
//!
//! [`Terminal`] snapshots the attributes of a terminal file descriptor, puts
//! it in raw mode and restores the snapshot exactly once: either through
//! [`Terminal::restore`] or when the guard is dropped.

use crate::errors::ShellResult;
use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};
use std::os::fd::AsFd;
use tracing::{debug, warn};

/// Where the terminal is in its raw-mode lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalMode {
    Cooked,
    Raw,
    Restoring,
}

pub struct Terminal<F: AsFd> {
    fd: F,
    original: Termios,
    mode: TerminalMode,
}

/// Raw-mode attributes derived from `original`: no line buffering, echo,
/// signal characters or extended processing; reads return after one byte
/// with no inter-byte timeout. Output processing is untouched.
pub fn raw_attributes(original: &Termios) -> Termios {
    let mut raw = original.clone();
    raw.local_flags
        .remove(LocalFlags::ICANON | LocalFlags::ECHO | LocalFlags::ISIG | LocalFlags::IEXTEN);
    raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
    raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
    raw
}

impl<F: AsFd> Terminal<F> {
    /// Capture the current attributes of `fd`.
    pub fn capture(fd: F) -> ShellResult<Self> {
        let original = termios::tcgetattr(fd.as_fd())?;
        Ok(Self {
            fd,
            original,
            mode: TerminalMode::Cooked,
        })
    }

    pub fn mode(&self) -> TerminalMode {
        self.mode
    }

    pub fn enter_raw(&mut self) -> ShellResult<()> {
        if self.mode == TerminalMode::Raw {
            return Ok(());
        }
        termios::tcsetattr(self.fd.as_fd(), SetArg::TCSAFLUSH, &raw_attributes(&self.original))?;
        self.mode = TerminalMode::Raw;
        debug!("terminal in raw mode");
        Ok(())
    }

    /// Put the captured attributes back. A no-op unless the terminal is raw.
    pub fn restore(&mut self) -> ShellResult<()> {
        if self.mode != TerminalMode::Raw {
            return Ok(());
        }
        self.mode = TerminalMode::Restoring;
        let result = termios::tcsetattr(self.fd.as_fd(), SetArg::TCSAFLUSH, &self.original);
        self.mode = TerminalMode::Cooked;
        result?;
        debug!("terminal restored");
        Ok(())
    }
}

impl<F: AsFd> Drop for Terminal<F> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "failed to restore terminal attributes");
        }
    }
}
