use crate::controller::ControllerEvent;
use crate::orientation::SensorSample;
use regex::Regex;
use std::sync::LazyLock;

static SAMPLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(accel|mag)\s+(\S+)\s+(\S+)\s+(\S+)$").unwrap());
static CONNECT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)connect(?:\s+(\S+))?$").unwrap());

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Event(ControllerEvent),
    Quit,
}

impl ConsoleCommand {
    /// Parses one line. Blank or unrecognized input yields `None`.
    ///
    /// ```text
    /// accel <x> <y> <z>    mag <x> <y> <z>
    /// align    send    connect [peer]    close    quit
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Some(caps) = SAMPLE_REGEX.captures(line) {
            let x = caps[2].parse().ok()?;
            let y = caps[3].parse().ok()?;
            let z = caps[4].parse().ok()?;
            let sample = if caps[1].eq_ignore_ascii_case("accel") {
                SensorSample::accelerometer(x, y, z)
            } else {
                SensorSample::magnetometer(x, y, z)
            };
            return Some(Self::Event(ControllerEvent::Sample(sample)));
        }
        if let Some(caps) = CONNECT_REGEX.captures(line) {
            let peer = caps.get(1).map(|m| String::from(m.as_str()));
            return Some(Self::Event(ControllerEvent::Connect(peer)));
        }
        match line.to_ascii_lowercase().as_str() {
            "align" => Some(Self::Event(ControllerEvent::Align)),
            "send" => Some(Self::Event(ControllerEvent::Transmit)),
            "close" => Some(Self::Event(ControllerEvent::Disconnect)),
            "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}
