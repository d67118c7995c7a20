use super::command::ConsoleCommand;
use crate::controller::ControllerEvent;
use crate::{event, log, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Forwards console lines to the controller as [`ControllerEvent`]s.
pub struct ConsoleReader<R> {
    input: R,
    event_tx: mpsc::Sender<ControllerEvent>,
}

impl ConsoleReader<BufReader<tokio::io::Stdin>> {
    pub fn stdin(event_tx: mpsc::Sender<ControllerEvent>) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), event_tx)
    }
}

impl<R: AsyncBufRead + Unpin> ConsoleReader<R> {
    pub fn new(input: R, event_tx: mpsc::Sender<ControllerEvent>) -> Self { Self { input, event_tx } }

    /// Reads until `quit`, end of input or cancellation, then cancels `c_tok`.
    pub async fn run(self, c_tok: CancellationToken) {
        let mut lines = self.input.lines();
        loop {
            let line = tokio::select! {
                () = c_tok.cancelled() => break,
                line = lines.next_line() => line,
            };
            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => {
                    log!("Console input closed");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read console input: {e}");
                    break;
                }
            };
            match ConsoleCommand::parse(&line) {
                Some(ConsoleCommand::Event(ev)) => {
                    event!("Console event {ev:?}");
                    if self.event_tx.send(ev).await.is_err() {
                        break;
                    }
                }
                Some(ConsoleCommand::Quit) => break,
                None if line.trim().is_empty() => {}
                None => warn!("Unknown command {:?}", line.trim()),
            }
        }
        c_tok.cancel();
    }
}
