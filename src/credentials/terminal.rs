//! Controlling-terminal implementation of [`SecretTerminal`].
//!
//! On a TTY, echo is disabled by putting the terminal in raw mode and the line
//! is assembled from key events. When stdin is not a terminal (piped input),
//! there is nothing to hide and the line is read directly.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use super::SecretTerminal;

/// The process's own terminal (stdin/stdout).
pub struct ConsoleTerminal {
    interactive: bool,
    raw_mode: bool,
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
            raw_mode: false,
        }
    }

    fn read_keys(&mut self) -> io::Result<String> {
        let mut secret = String::new();
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Enter => return Ok(secret),
                KeyCode::Char('c') if ctrl => {
                    return Err(io::Error::new(
                        io::ErrorKind::Interrupted,
                        "password entry interrupted",
                    ));
                }
                KeyCode::Char('d') if ctrl && secret.is_empty() => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "end of input at password prompt",
                    ));
                }
                KeyCode::Char(c) => secret.push(c),
                KeyCode::Backspace => {
                    secret.pop();
                }
                _ => {}
            }
        }
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretTerminal for ConsoleTerminal {
    fn write_prompt(&mut self, prompt: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()
    }

    fn disable_echo(&mut self) -> io::Result<()> {
        if self.interactive {
            terminal::enable_raw_mode()?;
            self.raw_mode = true;
        }
        Ok(())
    }

    fn restore_echo(&mut self) -> io::Result<()> {
        if self.raw_mode {
            terminal::disable_raw_mode()?;
            self.raw_mode = false;
        }
        Ok(())
    }

    fn read_secret_line(&mut self) -> io::Result<String> {
        if self.interactive {
            return self.read_keys();
        }
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}
