use super::link_state::{LinkError, LinkState};
use super::transport::{PeerDevice, PeerStream, RadioAdapter, SERIAL_PORT_SERVICE};
use crate::{event, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Connection bookkeeping, only ever touched inside short synchronous sections.
#[derive(Default)]
struct LinkInner {
    state: LinkState,
    stream: Option<Box<dyn PeerStream>>,
    peer: Option<PeerDevice>,
    /// Bumped by every teardown; results of operations started under an older epoch are dropped.
    epoch: u64,
    /// Cancelled by every teardown; aborts the connect or write in flight.
    abort: CancellationToken,
    retired: bool,
}

/// The single serial link to the paired actuator.
///
/// `connect` and `send` are serialized by `io_lock`, so at most one of them
/// touches the transport at a time. `close` first aborts whatever operation
/// is in flight, then waits for it to let go of the transport, so the
/// connection is released by the time `close` returns.
pub struct SerialLink {
    adapter: Arc<dyn RadioAdapter>,
    connect_timeout: Duration,
    io_lock: tokio::sync::Mutex<()>,
    inner: Mutex<LinkInner>,
}

/// What to do with a connect result once the state has been updated.
enum ConnectOutcome {
    Connected,
    Failed(String),
    Stale(Option<Box<dyn PeerStream>>),
}

impl SerialLink {
    pub fn new(adapter: Arc<dyn RadioAdapter>, connect_timeout: Duration) -> Self {
        Self {
            adapter,
            connect_timeout,
            io_lock: tokio::sync::Mutex::new(()),
            inner: Mutex::new(LinkInner::default()),
        }
    }

    fn inner(&self) -> MutexGuard<'_, LinkInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> LinkState { self.inner().state }

    pub fn peer(&self) -> Option<PeerDevice> { self.inner().peer.clone() }

    /// Connects to the paired peer called `peer_name`.
    ///
    /// An existing connection is released first. No connection is attempted
    /// if the radio is disabled or the peer is not in the paired registry.
    ///
    /// # Errors
    /// * [`LinkError::AdapterDisabled`] if the radio is off.
    /// * [`LinkError::PeerNotFound`] if no paired peer has that exact name.
    /// * [`LinkError::ConnectFailed`] if the stream could not be opened in time
    ///   or the link was closed while connecting.
    pub async fn connect(&self, peer_name: &str) -> Result<(), LinkError> {
        let _io = self.io_lock.lock().await;
        if !self.adapter.is_enabled() {
            return Err(LinkError::AdapterDisabled);
        }
        let peer = self
            .adapter
            .bonded_peers()
            .into_iter()
            .find(|p| p.name() == peer_name)
            .ok_or_else(|| LinkError::PeerNotFound { peer_name: String::from(peer_name) })?;

        let (epoch, abort, previous) = {
            let mut inner = self.inner();
            if inner.retired {
                return Err(LinkError::ConnectFailed { cause: String::from("link is shut down") });
            }
            inner.epoch += 1;
            inner.state = LinkState::Connecting;
            inner.peer = Some(peer.clone());
            inner.abort = CancellationToken::new();
            (inner.epoch, inner.abort.clone(), inner.stream.take())
        };
        if let Some(stream) = previous {
            Self::release(stream).await;
        }

        let opened = tokio::select! {
            biased;
            () = abort.cancelled() => None,
            opened = tokio::time::timeout(
                self.connect_timeout,
                self.adapter.open_stream(&peer, SERIAL_PORT_SERVICE),
            ) => Some(opened),
        };

        let outcome = {
            let mut inner = self.inner();
            if inner.epoch != epoch || inner.retired {
                ConnectOutcome::Stale(opened.and_then(Result::ok).and_then(Result::ok))
            } else {
                match opened {
                    None => ConnectOutcome::Stale(None),
                    Some(Ok(Ok(stream))) => {
                        inner.stream = Some(stream);
                        inner.state = LinkState::Connected;
                        ConnectOutcome::Connected
                    }
                    Some(Ok(Err(e))) => {
                        inner.state = LinkState::Disconnected;
                        inner.peer = None;
                        ConnectOutcome::Failed(e.to_string())
                    }
                    Some(Err(_)) => {
                        inner.state = LinkState::Disconnected;
                        inner.peer = None;
                        ConnectOutcome::Failed(format!(
                            "timed out after {}s",
                            self.connect_timeout.as_secs_f32()
                        ))
                    }
                }
            }
        };

        match outcome {
            ConnectOutcome::Connected => {
                info!("Serial link connected to {} ({})", peer.name(), peer.address());
                Ok(())
            }
            ConnectOutcome::Failed(cause) => {
                warn!("Serial link to {} failed: {cause}", peer.name());
                Err(LinkError::ConnectFailed { cause })
            }
            ConnectOutcome::Stale(stream) => {
                if let Some(s) = stream {
                    Self::release(s).await;
                }
                Err(LinkError::ConnectFailed { cause: String::from("link closed while connecting") })
            }
        }
    }

    /// Writes `payload` to the peer as a single frame.
    ///
    /// # Errors
    /// * [`LinkError::NotConnected`] unless the link is connected; no I/O is performed.
    /// * [`LinkError::WriteFailed`] on an I/O error, after which the link is disconnected,
    ///   or if the link is closed before the write completes.
    pub async fn send(&self, payload: &[u8]) -> Result<(), LinkError> {
        let _io = self.io_lock.lock().await;
        let (mut stream, epoch, abort) = {
            let mut inner = self.inner();
            if inner.state != LinkState::Connected {
                return Err(LinkError::NotConnected);
            }
            let Some(stream) = inner.stream.take() else {
                return Err(LinkError::NotConnected);
            };
            (stream, inner.epoch, inner.abort.clone())
        };

        let written = tokio::select! {
            biased;
            () = abort.cancelled() => None,
            written = stream.write_frame(payload) => Some(written),
        };

        let discard = {
            let mut inner = self.inner();
            if inner.epoch != epoch || inner.retired || written.is_none() {
                Some(stream)
            } else if matches!(written, Some(Ok(()))) {
                inner.stream = Some(stream);
                None
            } else {
                inner.epoch += 1;
                inner.state = LinkState::Disconnected;
                inner.peer = None;
                Some(stream)
            }
        };
        if let Some(s) = discard {
            Self::release(s).await;
        }

        match written {
            Some(Ok(())) => {
                event!("Sent frame {:?}", String::from_utf8_lossy(payload));
                Ok(())
            }
            Some(Err(e)) => {
                warn!("Serial write failed, link dropped: {e}");
                Err(LinkError::WriteFailed { cause: e.to_string() })
            }
            None => {
                warn!("Serial write aborted, link closed");
                Err(LinkError::WriteFailed { cause: String::from("link closed while sending") })
            }
        }
    }

    /// Releases the connection if open and returns to `Disconnected`.
    ///
    /// Idempotent; teardown errors are swallowed. A connect or send still in
    /// flight is aborted without touching the state, and has released its
    /// stream by the time this returns.
    pub async fn close(&self) {
        let stream = {
            let mut inner = self.inner();
            inner.epoch += 1;
            inner.state = LinkState::Disconnected;
            inner.peer = None;
            inner.abort.cancel();
            inner.stream.take()
        };
        let released = stream.is_some();
        if let Some(s) = stream {
            Self::release(s).await;
        }
        // an aborted operation gives the lock back only after releasing its stream
        drop(self.io_lock.lock().await);
        if released {
            info!("Serial link closed");
        }
    }

    /// Closes the link for good; later connects fail.
    pub async fn retire(&self) {
        self.inner().retired = true;
        self.close().await;
    }

    async fn release(mut stream: Box<dyn PeerStream>) {
        if let Err(e) = stream.shutdown().await {
            event!("Ignoring error while releasing serial stream: {e}");
        }
    }
}
