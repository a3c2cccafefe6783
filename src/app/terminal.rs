use std::{
    io::{self, Stdout},
    ops::{Deref, DerefMut},
    sync::Once,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

static RESTORE_ON_PANIC: Once = Once::new();

/// Terminal session hosting a form.
///
/// Pastes arrive as a single event so masks see the whole clipboard at once,
/// and window focus changes are reported so the host can commit on blur.
/// Everything is undone on drop and on panic.
pub struct FormTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl FormTerminal {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableBracketedPaste,
            EnableFocusChange
        )
        .context("failed to prepare terminal for form input")?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .context("failed to attach form renderer to terminal")?;
        RESTORE_ON_PANIC.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                leave();
                previous(info);
            }));
        });
        Ok(Self { terminal })
    }
}

impl Drop for FormTerminal {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        leave();
    }
}

impl Deref for FormTerminal {
    type Target = Terminal<CrosstermBackend<Stdout>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for FormTerminal {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

// Best effort: runs during unwinding too.
fn leave() {
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        DisableFocusChange,
        DisableBracketedPaste,
        LeaveAlternateScreen,
        Show
    );
}
