use strum_macros::Display;

/// Connection state of a [`SerialLink`](super::SerialLink).
///
/// ```text
/// Disconnected --connect--> Connecting --ok--> Connected
///                           Connecting --err-> Disconnected
/// Connected --close / write error--> Disconnected
/// ```
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Failure of a link operation. The `Display` text is the user-facing message.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[strum(to_string = "Please enable the serial radio")]
    AdapterDisabled,
    #[strum(to_string = "Device {peer_name} not found")]
    PeerNotFound { peer_name: String },
    #[strum(to_string = "Connection failed: {cause}")]
    ConnectFailed { cause: String },
    #[strum(to_string = "Serial link is not connected")]
    NotConnected,
    #[strum(to_string = "Failed to send data: {cause}")]
    WriteFailed { cause: String },
    #[strum(to_string = "Serial link is busy, request dropped")]
    Busy,
}

impl std::error::Error for LinkError {}
