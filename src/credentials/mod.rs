//! Interactive password prompt.
//!
//! The password is only ever read from the controlling terminal, never from a
//! flag or the environment. Echo is switched off through [`NoEchoGuard`], which
//! switches it back on when dropped, so the terminal is restored on every path
//! out of the prompt, including read errors and Ctrl-C.

mod terminal;

use std::io;

use log::warn;

pub use terminal::ConsoleTerminal;

/// Terminal operations the password prompt needs.
pub trait SecretTerminal {
    /// Writes the prompt text (without a trailing newline) and flushes it.
    fn write_prompt(&mut self, prompt: &str) -> io::Result<()>;

    /// Stops echoing typed characters.
    fn disable_echo(&mut self) -> io::Result<()>;

    /// Restores the terminal mode saved by `disable_echo`.
    fn restore_echo(&mut self) -> io::Result<()>;

    /// Reads one line of input. May include the line terminator.
    fn read_secret_line(&mut self) -> io::Result<String>;
}

/// Holds a terminal in no-echo mode for as long as it lives.
pub struct NoEchoGuard<'a, T: SecretTerminal + ?Sized> {
    terminal: &'a mut T,
}

impl<'a, T: SecretTerminal + ?Sized> NoEchoGuard<'a, T> {
    /// Disables echo on `terminal`.
    pub fn acquire(terminal: &'a mut T) -> io::Result<Self> {
        terminal.disable_echo()?;
        Ok(Self { terminal })
    }

    pub fn read_line(&mut self) -> io::Result<String> {
        self.terminal.read_secret_line()
    }
}

impl<T: SecretTerminal + ?Sized> Drop for NoEchoGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.terminal.restore_echo() {
            warn!("Failed to restore terminal echo: {}", e);
        }
    }
}

/// Prompts for the console password of `username` without echoing it.
///
/// The trailing line terminator is removed; an empty password is returned as-is.
///
/// # Errors
///
/// Returns the underlying I/O error if the prompt cannot be written, echo cannot
/// be disabled, or reading fails. An interrupted read (Ctrl-C) surfaces as
/// `io::ErrorKind::Interrupted`.
pub fn prompt_password<T: SecretTerminal + ?Sized>(
    terminal: &mut T,
    username: &str,
) -> io::Result<String> {
    terminal.write_prompt(&format!("Nexpose password to {}: ", username))?;

    let line = {
        let mut guard = NoEchoGuard::acquire(terminal)?;
        guard.read_line()?
    };

    Ok(chomp(line))
}

/// Drops one trailing `\r\n`, `\n` or `\r`.
fn chomp(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    } else if line.ends_with('\r') {
        line.pop();
    }
    line
}
