// Terminal setup, teardown and input

use std::io::{self, Write};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute};
use tokio::sync::mpsc;

/// How often the input thread checks whether the app is gone
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Raw mode plus the alternate screen for as long as the guard lives
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter<W: Write>(out: &mut W) -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(out, EnterAlternateScreen, cursor::Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Read terminal events on a plain thread and forward them.
///
/// The thread exits once the receiver is dropped or the terminal errors.
pub fn spawn_input_reader(tx: mpsc::Sender<Event>) -> JoinHandle<()> {
    thread::spawn(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(INPUT_POLL_INTERVAL) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if tx.blocking_send(evt).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read terminal event");
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to poll terminal events");
                break;
            }
        }
    })
}
