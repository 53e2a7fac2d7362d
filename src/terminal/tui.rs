//! TUI wrapper managing the ratatui terminal with a crossterm backend.
//!
//! Handles terminal lifecycle (raw mode, alternate screen, panic recovery)
//! while delegating all drawing to the `rendering` module.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::atomic::Ordering;

use super::raw_mode::{install_panic_hook, RAW_MODE_ACTIVE};
use super::rendering::{self, SessionView};

/// Terminal handle for the detection session.
///
/// Creating one enters raw mode and the alternate screen; dropping it (or
/// calling [`Tui::restore`]) puts the terminal back, panics included.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Whether this instance still owns terminal cleanup.
    active: bool,
}

impl Tui {
    /// Enter raw mode and the alternate screen, ready to draw.
    ///
    /// # Errors
    /// Returns an error if raw mode, the alternate screen, or the terminal
    /// backend cannot be set up.
    pub fn new() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);

        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            active: true,
        })
    }

    /// Draw one full session screen.
    pub fn draw_session(&mut self, view: &SessionView) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            rendering::render_session(frame, view, area);
        })?;
        Ok(())
    }

    /// Restore the terminal to its original state.
    ///
    /// After this, drop is a no-op.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);

            crossterm::execute!(
                self.terminal.backend_mut(),
                crossterm::terminal::LeaveAlternateScreen,
            )?;
            disable_raw_mode()?;
            self.terminal.show_cursor()?;
        }
        Ok(())
    }

    /// Whether the terminal is still in session mode (not yet restored).
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);

            // Best-effort cleanup during drop.
            let _ = crossterm::execute!(
                self.terminal.backend_mut(),
                crossterm::terminal::LeaveAlternateScreen,
            );
            let _ = disable_raw_mode();
            let _ = self.terminal.show_cursor();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_new_and_drop_restores_flag() {
        // Requires a real TTY; skip silently in CI.
        match Tui::new() {
            Ok(tui) => {
                assert!(tui.is_active());
                assert!(RAW_MODE_ACTIVE.load(Ordering::SeqCst));
                drop(tui);
                assert!(!RAW_MODE_ACTIVE.load(Ordering::SeqCst));
            }
            Err(e) => {
                eprintln!("Skipping test (no TTY): {}", e);
            }
        }
    }

    #[test]
    fn test_tui_double_restore_is_noop() {
        match Tui::new() {
            Ok(mut tui) => {
                tui.restore().expect("first restore should succeed");
                assert!(!tui.is_active());
                tui.restore().expect("second restore should be a no-op");
            }
            Err(e) => {
                eprintln!("Skipping test (no TTY): {}", e);
            }
        }
    }
}
