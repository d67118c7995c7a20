use crate::orientation::SensorSample;

/// Inputs driving the [`AlignmentController`](super::AlignmentController).
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// A new accelerometer or magnetometer reading.
    Sample(SensorSample),
    /// Look up the tracked body for the current time and location.
    Align,
    /// Relay the current bearing to the actuator.
    Transmit,
    /// Connect to the named peer, or the configured default.
    Connect(Option<String>),
    /// Release the serial link.
    Disconnect,
}
