use super::link_state::LinkError;
use super::serial_link::SerialLink;
use crate::{event, warn};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Requests executed by the [`LinkWorker`], strictly in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkCommand {
    Connect(String),
    Send(Vec<u8>),
}

/// Completion reports emitted by the [`LinkWorker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Connected { peer_name: String },
    Sent { payload: Vec<u8> },
    Failed { error: LinkError },
}

/// The dedicated link-I/O task.
///
/// All blocking link operations run here, one at a time, so the submitting
/// side never waits on the transport. Shutting the worker down cancels the
/// operation in progress and retires the link.
pub struct LinkWorker {
    link: Arc<SerialLink>,
    cmd_tx: mpsc::Sender<LinkCommand>,
    c_tok: CancellationToken,
    handle: JoinHandle<()>,
}

impl LinkWorker {
    const QUEUE_DEPTH: usize = 8;

    /// Spawns the worker task.
    ///
    /// # Returns
    /// The worker handle and the receiver its [`LinkEvent`]s are delivered on.
    pub fn start(link: Arc<SerialLink>, c_tok: CancellationToken) -> (Self, mpsc::Receiver<LinkEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(Self::QUEUE_DEPTH);
        let (event_tx, event_rx) = mpsc::channel(Self::QUEUE_DEPTH);
        let handle = tokio::spawn(Self::run(Arc::clone(&link), cmd_rx, event_tx, c_tok.clone()));
        (Self { link, cmd_tx, c_tok, handle }, event_rx)
    }

    async fn run(
        link: Arc<SerialLink>,
        mut cmd_rx: mpsc::Receiver<LinkCommand>,
        event_tx: mpsc::Sender<LinkEvent>,
        c_tok: CancellationToken,
    ) {
        loop {
            let cmd = tokio::select! {
                biased;
                () = c_tok.cancelled() => break,
                cmd = cmd_rx.recv() => match cmd {
                    Some(cmd) => cmd,
                    None => break,
                },
            };
            event!("Link worker executing {cmd:?}");
            let ev = tokio::select! {
                biased;
                () = c_tok.cancelled() => break,
                ev = Self::execute(&link, cmd) => ev,
            };
            if event_tx.send(ev).await.is_err() {
                break;
            }
        }
        link.retire().await;
    }

    async fn execute(link: &SerialLink, cmd: LinkCommand) -> LinkEvent {
        let result = match &cmd {
            LinkCommand::Connect(peer_name) => link.connect(peer_name).await,
            LinkCommand::Send(payload) => link.send(payload).await,
        };
        match (result, cmd) {
            (Ok(()), LinkCommand::Connect(peer_name)) => LinkEvent::Connected { peer_name },
            (Ok(()), LinkCommand::Send(payload)) => LinkEvent::Sent { payload },
            (Err(error), _) => LinkEvent::Failed { error },
        }
    }

    /// Queues `cmd` without waiting.
    ///
    /// # Errors
    /// [`LinkError::Busy`] if the queue is full, [`LinkError::NotConnected`] if the worker has stopped.
    pub fn submit(&self, cmd: LinkCommand) -> Result<(), LinkError> {
        self.cmd_tx.try_send(cmd).map_err(|e| match e {
            TrySendError::Full(cmd) => {
                warn!("Link queue full, dropping {cmd:?}");
                LinkError::Busy
            }
            TrySendError::Closed(_) => LinkError::NotConnected,
        })
    }

    /// Closes the current connection without stopping the worker.
    pub async fn close(&self) { self.link.close().await; }

    pub fn link(&self) -> &Arc<SerialLink> { &self.link }

    /// Stops the worker, cancelling any operation in flight, and releases the link.
    pub async fn shutdown(self) {
        self.c_tok.cancel();
        if let Err(e) = self.handle.await {
            warn!("Link worker ended abnormally: {e}");
        }
        self.link.retire().await;
    }
}
