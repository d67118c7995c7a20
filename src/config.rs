use crate::controller::LocationFix;
use crate::serial_link::PeerDevice;
use crate::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_EPHEMERIS_URL: &str = "https://aa.usno.navy.mil";
const DEFAULT_TARGET_BODY: &str = "Sun";
const DEFAULT_PEER_NAME: &str = "eeehooo";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Runtime settings, read once at startup from `SKY_*` environment variables.
///
/// Malformed values are reported and replaced by their defaults.
#[derive(Debug, Clone)]
pub struct SkyConfig {
    ephemeris_url: String,
    target_body: String,
    peer_name: String,
    http_timeout: Duration,
    connect_timeout: Duration,
    location: Option<LocationFix>,
    peers: Vec<PeerDevice>,
    radio_enabled: bool,
}

impl SkyConfig {
    pub fn from_env() -> Self { Self::from_lookup(|key| env::var(key).ok()) }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str, default: &str| {
            lookup(key).filter(|v| !v.trim().is_empty()).unwrap_or_else(|| String::from(default))
        };
        let secs = |key: &str, default: u64| Duration::from_secs(parsed(&lookup, key, default));

        let latitude = lookup("SKY_LATITUDE").and_then(|v| parse_or_warn::<f64>("SKY_LATITUDE", &v));
        let longitude =
            lookup("SKY_LONGITUDE").and_then(|v| parse_or_warn::<f64>("SKY_LONGITUDE", &v));
        let location = match (latitude, longitude) {
            (Some(lat), Some(lon)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) => {
                Some(LocationFix::new(lat, lon))
            }
            (Some(lat), Some(lon)) => {
                warn!("Ignoring out-of-range location {lat},{lon}");
                None
            }
            _ => None,
        };

        Self {
            ephemeris_url: text("SKY_EPHEMERIS_URL", DEFAULT_EPHEMERIS_URL),
            target_body: text("SKY_TARGET_BODY", DEFAULT_TARGET_BODY),
            peer_name: text("SKY_PEER_NAME", DEFAULT_PEER_NAME),
            http_timeout: secs("SKY_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
            connect_timeout: secs("SKY_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            location,
            peers: lookup("SKY_PEERS").map(|v| parse_peers(&v)).unwrap_or_default(),
            radio_enabled: parsed(&lookup, "SKY_RADIO_ENABLED", true),
        }
    }

    pub fn ephemeris_url(&self) -> &str { &self.ephemeris_url }
    pub fn target_body(&self) -> &str { &self.target_body }
    pub fn peer_name(&self) -> &str { &self.peer_name }
    pub fn http_timeout(&self) -> Duration { self.http_timeout }
    pub fn connect_timeout(&self) -> Duration { self.connect_timeout }
    pub fn location(&self) -> Option<LocationFix> { self.location }
    pub fn peers(&self) -> &[PeerDevice] { &self.peers }
    pub fn radio_enabled(&self) -> bool { self.radio_enabled }
}

fn parsed<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key).and_then(|v| parse_or_warn(key, &v)).unwrap_or(default)
}

fn parse_or_warn<T: FromStr>(key: &str, value: &str) -> Option<T> {
    let res = value.trim().parse().ok();
    if res.is_none() {
        warn!("Ignoring malformed {key}={value:?}");
    }
    res
}

/// Parses the paired-peer registry, `name=host:port` entries separated by commas.
fn parse_peers(value: &str) -> Vec<PeerDevice> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.split_once('=') {
            Some((name, address)) if !name.trim().is_empty() && !address.trim().is_empty() => {
                Some(PeerDevice::new(name.trim(), address.trim()))
            }
            _ => {
                warn!("Ignoring malformed peer entry {entry:?}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> SkyConfig {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (String::from(*k), String::from(*v))).collect();
        SkyConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.ephemeris_url(), DEFAULT_EPHEMERIS_URL);
        assert_eq!(cfg.target_body(), "Sun");
        assert_eq!(cfg.peer_name(), "eeehooo");
        assert_eq!(cfg.http_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.connect_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.location(), None);
        assert!(cfg.peers().is_empty());
        assert!(cfg.radio_enabled());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("SKY_EPHEMERIS_URL", "http://localhost:8080"),
            ("SKY_TARGET_BODY", "Moon"),
            ("SKY_HTTP_TIMEOUT_SECS", "2"),
            ("SKY_LATITUDE", "52.52"),
            ("SKY_LONGITUDE", "13.405"),
            ("SKY_RADIO_ENABLED", "false"),
        ]);
        assert_eq!(cfg.ephemeris_url(), "http://localhost:8080");
        assert_eq!(cfg.target_body(), "Moon");
        assert_eq!(cfg.http_timeout(), Duration::from_secs(2));
        assert_eq!(cfg.location(), Some(LocationFix::new(52.52, 13.405)));
        assert!(!cfg.radio_enabled());
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let cfg = config(&[
            ("SKY_CONNECT_TIMEOUT_SECS", "soon"),
            ("SKY_RADIO_ENABLED", "yes"),
            ("SKY_LATITUDE", "north"),
            ("SKY_LONGITUDE", "13.4"),
            ("SKY_PEER_NAME", "  "),
        ]);
        assert_eq!(cfg.connect_timeout(), Duration::from_secs(10));
        assert!(cfg.radio_enabled());
        assert_eq!(cfg.location(), None);
        assert_eq!(cfg.peer_name(), "eeehooo");
    }

    #[test]
    fn test_out_of_range_location_is_dropped() {
        let cfg = config(&[("SKY_LATITUDE", "91.0"), ("SKY_LONGITUDE", "0.0")]);
        assert_eq!(cfg.location(), None);
    }

    #[test]
    fn test_peer_registry() {
        let cfg = config(&[("SKY_PEERS", "eeehooo=127.0.0.1:7000, broken,=x:1 ,mast=10.0.0.2:7001,")]);
        assert_eq!(
            cfg.peers(),
            [PeerDevice::new("eeehooo", "127.0.0.1:7000"), PeerDevice::new("mast", "10.0.0.2:7001")]
        );
    }
}
