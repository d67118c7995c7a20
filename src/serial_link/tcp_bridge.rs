use super::transport::{PeerDevice, PeerStream, RadioAdapter};
use crate::event;
use async_trait::async_trait;
use std::io;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use uuid::Uuid;

/// [`RadioAdapter`] for actuators reachable through a serial-over-TCP bridge.
///
/// The paired-device registry is static: each peer's address is the
/// `host:port` the bridge exposes its serial port on.
#[derive(Debug, Clone)]
pub struct TcpBridgeAdapter {
    enabled: bool,
    peers: Vec<PeerDevice>,
}

impl TcpBridgeAdapter {
    pub fn new(enabled: bool, peers: Vec<PeerDevice>) -> Self { Self { enabled, peers } }
}

#[async_trait]
impl RadioAdapter for TcpBridgeAdapter {
    fn is_enabled(&self) -> bool { self.enabled }

    fn bonded_peers(&self) -> Vec<PeerDevice> { self.peers.clone() }

    async fn open_stream(&self, peer: &PeerDevice, service: Uuid) -> io::Result<Box<dyn PeerStream>> {
        event!("Opening {service} stream to {} at {}", peer.name(), peer.address());
        let stream = TcpStream::connect(peer.address()).await?;
        stream.set_nodelay(true)?;
        Ok(Box::new(TcpPeerStream { stream }))
    }
}

struct TcpPeerStream {
    stream: TcpStream,
}

#[async_trait]
impl PeerStream for TcpPeerStream {
    async fn write_frame(&mut self, payload: &[u8]) -> io::Result<()> {
        self.stream.write_all(payload).await?;
        self.stream.flush().await
    }

    async fn shutdown(&mut self) -> io::Result<()> { self.stream.shutdown().await }
}
