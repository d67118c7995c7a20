use super::{
    AlignmentController, AlignmentError, ControllerEvent, LocationError, LocationFix, Notifier,
    QueryTracker, StaticLocation,
};
use crate::config::SkyConfig;
use crate::ephemeris::tests::{CATALOG, answer, serve_once};
use crate::ephemeris::CelestialRecord;
use crate::http_handler::http_client::HTTPClient;
use crate::keychain::Keychain;
use crate::orientation::SensorSample;
use crate::serial_link::{LinkState, PeerDevice, TcpBridgeAdapter};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const WAIT: Duration = Duration::from_secs(5);

/// Forwards every notification to the test.
struct ChannelNotifier(mpsc::UnboundedSender<String>);

impl Notifier for ChannelNotifier {
    fn notify(&self, message: &str) { let _ = self.0.send(String::from(message)); }
}

struct Harness {
    events: mpsc::Sender<ControllerEvent>,
    notes: mpsc::UnboundedReceiver<String>,
    c_tok: CancellationToken,
    handle: JoinHandle<AlignmentController>,
    keychain: Keychain,
}

impl Harness {
    fn start(base_url: &str, peers: Vec<PeerDevice>, fix: Option<LocationFix>) -> Self {
        let config = SkyConfig::from_lookup(|_| None);
        let inner = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = Arc::new(HTTPClient::with_client(base_url, inner));
        let adapter = Arc::new(TcpBridgeAdapter::new(true, peers));
        let keychain = Keychain::from_parts(client, "Sun", adapter, &config);
        let (note_tx, notes) = mpsc::unbounded_channel();
        let controller = AlignmentController::new(
            &keychain,
            Arc::new(StaticLocation::new(fix)),
            Arc::new(ChannelNotifier(note_tx)),
            config.peer_name(),
        );
        let (events, rx) = mpsc::channel(16);
        let c_tok = CancellationToken::new();
        let handle = tokio::spawn(controller.run(rx, c_tok.clone()));
        Self { events, notes, c_tok, handle, keychain }
    }

    async fn send(&self, ev: ControllerEvent) { self.events.send(ev).await.unwrap(); }

    async fn next_note(&mut self) -> String {
        tokio::time::timeout(WAIT, self.notes.recv()).await.unwrap().unwrap()
    }

    async fn stop(self) -> AlignmentController {
        self.c_tok.cancel();
        self.handle.await.unwrap()
    }
}

fn berlin() -> Option<LocationFix> { Some(LocationFix::new(52.52, 13.405)) }

/// Samples of a flat device whose y-axis points `heading_deg` east of north.
fn flat_samples(heading_deg: f64) -> [ControllerEvent; 2] {
    let psi = heading_deg.to_radians();
    [
        ControllerEvent::Sample(SensorSample::accelerometer(0.0, 0.0, 9.81)),
        ControllerEvent::Sample(SensorSample::magnetometer(-20.0 * psi.sin(), 20.0 * psi.cos(), -40.0)),
    ]
}

#[test]
fn test_tracker_only_latest_is_current() {
    let mut tracker = QueryTracker::new();
    assert_eq!(tracker.latest(), 0);
    let first = tracker.issue();
    let second = tracker.issue();
    assert!(second > first);
    assert!(!tracker.is_latest(first));
    assert!(tracker.is_latest(second));
}

#[test]
fn test_error_messages_are_passed_through() {
    assert_eq!(AlignmentError::from(LocationError::Unavailable).to_string(), "Failed to get location.");
    assert_eq!(
        AlignmentError::from(crate::serial_link::LinkError::NotConnected).to_string(),
        "Serial link is not connected"
    );
}

#[tokio::test]
async fn test_transmit_without_bearing_is_reported() {
    let mut h = Harness::start("http://127.0.0.1:9", Vec::new(), berlin());
    h.send(ControllerEvent::Transmit).await;
    assert_eq!(h.next_note().await, "Heading not available yet");
    let controller = h.stop().await;
    assert_eq!(controller.bearing(), None);
}

#[tokio::test]
async fn test_transmit_before_connect_fails() {
    let mut h = Harness::start("http://127.0.0.1:9", Vec::new(), berlin());
    for ev in flat_samples(90.5) {
        h.send(ev).await;
    }
    h.send(ControllerEvent::Transmit).await;
    assert_eq!(h.next_note().await, "Serial link is not connected");
    let controller = h.stop().await;
    assert_eq!(controller.bearing().map(|b| b.degrees()), Some(-90));
}

#[tokio::test]
async fn test_connect_and_transmit_current_bearing() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let reader = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        socket.read_to_end(&mut received).await.unwrap();
        received
    });

    let mut h = Harness::start("http://127.0.0.1:9", vec![PeerDevice::new("eeehooo", addr)], berlin());
    h.send(ControllerEvent::Connect(None)).await;
    assert_eq!(h.next_note().await, "Connected to eeehooo");

    for ev in flat_samples(200.5) {
        h.send(ev).await;
    }
    h.send(ControllerEvent::Transmit).await;
    assert_eq!(h.next_note().await, "Data sent: 160");

    h.send(ControllerEvent::Disconnect).await;
    let received = tokio::time::timeout(WAIT, reader).await.unwrap().unwrap();
    assert_eq!(received, b"160".to_vec());

    let link = h.keychain.link();
    h.stop().await;
    assert_eq!(link.state(), LinkState::Disconnected);
}

#[tokio::test]
async fn test_connect_to_unknown_peer_is_reported() {
    let mut h = Harness::start("http://127.0.0.1:9", Vec::new(), berlin());
    h.send(ControllerEvent::Connect(Some(String::from("mast")))).await;
    assert_eq!(h.next_note().await, "Device mast not found");
    h.stop().await;
}

#[tokio::test]
async fn test_align_reports_sun_and_heading() {
    let (url, _server) = serve_once("200 OK", CATALOG).await;
    let mut h = Harness::start(&url, Vec::new(), berlin());
    for ev in flat_samples(10.5) {
        h.send(ev).await;
    }
    h.send(ControllerEvent::Align).await;
    assert_eq!(h.next_note().await, "Sun: hc=45.2, zn=180.3, heading=-10");
    let controller = h.stop().await;
    assert_eq!(controller.last_record(), Some(&CelestialRecord::new("Sun", 45.2, 180.3)));
}

#[tokio::test]
async fn test_superseded_lookup_is_discarded() {
    const LATER: &str = r#"{"properties": {"data": [{"almanac_data": {"hc": 10.0, "zn": 90.0}, "object": "Sun"}]}}"#;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (accepted_tx, mut accepted) = mpsc::unbounded_channel();
    let server = tokio::spawn(async move {
        let (slow, _) = listener.accept().await.unwrap();
        accepted_tx.send(()).unwrap();
        let slow = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            answer(slow, "200 OK", CATALOG).await
        });
        let (fast, _) = listener.accept().await.unwrap();
        answer(fast, "200 OK", LATER).await;
        slow.await.unwrap();
    });

    let mut h = Harness::start(&url, Vec::new(), berlin());
    h.send(ControllerEvent::Align).await;
    tokio::time::timeout(WAIT, accepted.recv()).await.unwrap().unwrap();
    h.send(ControllerEvent::Align).await;
    assert_eq!(h.next_note().await, "Sun: hc=10, zn=90, heading=n/a");

    tokio::time::timeout(WAIT, server).await.unwrap().unwrap();
    assert!(tokio::time::timeout(Duration::from_millis(300), h.notes.recv()).await.is_err());
    let controller = h.stop().await;
    assert_eq!(controller.last_record(), Some(&CelestialRecord::new("Sun", 10.0, 90.0)));
}

#[tokio::test]
async fn test_align_without_location_is_reported() {
    let mut h = Harness::start("http://127.0.0.1:9", Vec::new(), None);
    h.send(ControllerEvent::Align).await;
    assert_eq!(h.next_note().await, "Failed to get location.");
    let controller = h.stop().await;
    assert_eq!(controller.last_record(), None);
}

#[tokio::test]
async fn test_align_service_error_is_reported() {
    let (url, _server) = serve_once("500 Internal Server Error", "{}").await;
    let mut h = Harness::start(&url, Vec::new(), berlin());
    h.send(ControllerEvent::Align).await;
    assert_eq!(h.next_note().await, "API Error: 500");
    h.stop().await;
}

#[tokio::test]
async fn test_closing_events_stops_controller() {
    let h = Harness::start("http://127.0.0.1:9", Vec::new(), berlin());
    let Harness { events, handle, .. } = h;
    drop(events);
    let controller = tokio::time::timeout(WAIT, handle).await.unwrap().unwrap();
    assert_eq!(controller.bearing(), None);
}
