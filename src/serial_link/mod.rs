//! Point-to-point serial relay to the pointing actuator.
//!
//! `serial_link` owns the connection state machine, `link_worker` is the single
//! I/O task serializing connect and send requests, `transport` describes the
//! platform radio seam and `tcp_bridge` implements it for serial-over-TCP servers.

mod link_state;
mod link_worker;
mod serial_link;
mod tcp_bridge;
mod transport;

pub use link_state::{LinkError, LinkState};
pub use link_worker::{LinkCommand, LinkEvent, LinkWorker};
pub use serial_link::SerialLink;
pub use tcp_bridge::TcpBridgeAdapter;
pub use transport::{PeerDevice, PeerStream, RadioAdapter, SERIAL_PORT_SERVICE};
