use async_trait::async_trait;
use std::io;
use uuid::Uuid;

/// Service identifier of the standard serial-port profile.
pub const SERIAL_PORT_SERVICE: Uuid = Uuid::from_u128(0x0000_1101_0000_1000_8000_0080_5F9B_34FB);

/// A previously paired remote device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerDevice {
    name: String,
    address: String,
}

impl PeerDevice {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self { name: name.into(), address: address.into() }
    }
    pub fn name(&self) -> &str { &self.name }
    pub fn address(&self) -> &str { &self.address }
}

/// Platform radio the serial link is opened through.
#[async_trait]
pub trait RadioAdapter: Send + Sync {
    /// Whether the radio is switched on.
    fn is_enabled(&self) -> bool;
    /// The paired-device registry.
    fn bonded_peers(&self) -> Vec<PeerDevice>;
    /// Opens a stream-oriented connection to `peer` for the given service.
    async fn open_stream(&self, peer: &PeerDevice, service: Uuid) -> io::Result<Box<dyn PeerStream>>;
}

/// An open stream to the peer.
#[async_trait]
pub trait PeerStream: Send {
    /// Writes `payload` as one frame and flushes it.
    async fn write_frame(&mut self, payload: &[u8]) -> io::Result<()>;
    /// Releases the connection.
    async fn shutdown(&mut self) -> io::Result<()>;
}
