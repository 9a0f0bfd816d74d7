//! Terminal session: scoped ownership of terminal-mode state.
//!
//! Raw mode, the alternate screen, mouse tracking, and cursor visibility
//! form one process-lifetime resource. The session acquires them on entry
//! and restores them exactly once on every exit path; `Drop` covers
//! panics and early returns.

use crossterm::tty::IsTty;
use crossterm::{cursor, event, execute, terminal};
use std::io::{self, Write};

/// What a session switches on at entry.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Use the alternate screen (full-screen mode).
    pub alternate_screen: bool,
    /// Enable mouse reporting.
    pub mouse_capture: bool,
    /// Hide the cursor while the session is live.
    pub hide_cursor: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            mouse_capture: false,
            hide_cursor: true,
        }
    }
}

/// An owned terminal-mode session.
///
/// Constructing one commits mode changes; dropping it (or calling
/// [`TerminalSession::restore`]) rolls every change back. Restoration is
/// idempotent so explicit and drop-time restores cannot double-fire.
pub struct TerminalSession {
    options: SessionOptions,
    restored: bool,
}

impl TerminalSession {
    /// Enter a terminal session.
    ///
    /// Fails before committing any mode change when stdout is not a
    /// terminal or raw mode is refused.
    pub fn enter(options: SessionOptions) -> io::Result<Self> {
        let mut stdout = io::stdout();
        if !stdout.is_tty() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdout is not a terminal",
            ));
        }

        terminal::enable_raw_mode()?;

        // Past this point cleanup must run; build the session first so an
        // execute failure still restores what was committed.
        let mut session = Self {
            options,
            restored: false,
        };

        let result = (|| -> io::Result<()> {
            if options.alternate_screen {
                execute!(stdout, terminal::EnterAlternateScreen)?;
            }
            if options.mouse_capture {
                execute!(stdout, event::EnableMouseCapture)?;
            }
            if options.hide_cursor {
                execute!(stdout, cursor::Hide)?;
            }
            stdout.flush()
        })();

        if let Err(e) = result {
            session.restore();
            return Err(e);
        }
        Ok(session)
    }

    /// Query the current terminal size.
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Restore original terminal settings. Idempotent.
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        // Best effort: restore everything we can even if one step fails.
        let mut stdout = io::stdout();
        if self.options.hide_cursor {
            let _ = execute!(stdout, cursor::Show);
        }
        if self.options.mouse_capture {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        if self.options.alternate_screen {
            let _ = execute!(stdout, terminal::LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
    }

    /// Whether the session has been restored.
    pub const fn is_restored(&self) -> bool {
        self.restored
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.restore();
    }
}
