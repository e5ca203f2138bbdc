//! Keyboard and Ctrl+C input for recording control
//!
//! Terminal lines and interrupts arrive on one channel so a runner can wait
//! for "stop" from either source alongside its other work.

use std::io::{self, BufRead};

use tokio::sync::mpsc;
use tracing::debug;

/// Something the user did at the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// A line was entered (without its newline)
    Line(String),
    /// Ctrl+C
    Interrupt,
    /// Standard input reached end of file; interrupts may still follow
    Closed,
}

/// Merged stdin and Ctrl+C events
pub struct UserInputHandler {
    receiver: mpsc::UnboundedReceiver<UserInput>,
}

impl UserInputHandler {
    /// Start listening to stdin and Ctrl+C.
    ///
    /// Stdin is read on a plain thread: a blocked read there never holds up
    /// runtime shutdown. Once created, Ctrl+C no longer terminates the process.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let lines = tx.clone();
        let spawned = std::thread::Builder::new()
            .name("vocawork-stdin".to_string())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    match line {
                        Ok(line) => {
                            if lines.send(UserInput::Line(line)).is_err() {
                                return;
                            }
                        }
                        Err(err) => {
                            debug!(error = %err, "stdin read failed");
                            break;
                        }
                    }
                }
                let _ = lines.send(UserInput::Closed);
            });
        if spawned.is_err() {
            let _ = tx.send(UserInput::Closed);
        }

        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send(UserInput::Interrupt).is_err() {
                    break;
                }
            }
        });

        Self { receiver: rx }
    }

    /// Handler fed from an existing channel
    pub fn from_receiver(receiver: mpsc::UnboundedReceiver<UserInput>) -> Self {
        Self { receiver }
    }

    /// Wait for the next event; `None` once every source is gone
    pub async fn recv(&mut self) -> Option<UserInput> {
        self.receiver.recv().await
    }
}
