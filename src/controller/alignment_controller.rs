use super::alignment_error::AlignmentError;
use super::location::LocationProvider;
use super::notifier::Notifier;
use super::query_tracker::QueryTracker;
use super::signal::ControllerEvent;
use crate::ephemeris::{CelestialRecord, EphemerisClient, EphemerisQuery};
use crate::keychain::Keychain;
use crate::orientation::{Bearing, OrientationEstimator, SensorSample};
use crate::serial_link::{LinkCommand, LinkEvent, LinkWorker, SerialLink};
use crate::{event, info, log};
use chrono::Local;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Result of one ephemeris lookup, tagged with the sequence number it was issued under.
struct QueryReport {
    seq: u64,
    result: Result<CelestialRecord, AlignmentError>,
}

/// Ties the sensor pipeline, the ephemeris lookup and the serial link together.
///
/// All events are handled on a single task. Network lookups and link I/O run
/// on their own tasks and report back through channels, so a slow service or
/// a stalled connect never holds up sensor processing.
pub struct AlignmentController {
    estimator: OrientationEstimator,
    bearing: Option<Bearing>,
    last_record: Option<CelestialRecord>,
    tracker: QueryTracker,
    ephemeris: Arc<EphemerisClient>,
    link: Arc<SerialLink>,
    location: Arc<dyn LocationProvider>,
    notifier: Arc<dyn Notifier>,
    default_peer: String,
}

impl AlignmentController {
    const REPORT_DEPTH: usize = 4;

    pub fn new(
        keychain: &Keychain,
        location: Arc<dyn LocationProvider>,
        notifier: Arc<dyn Notifier>,
        default_peer: &str,
    ) -> Self {
        Self {
            estimator: OrientationEstimator::new(),
            bearing: None,
            last_record: None,
            tracker: QueryTracker::new(),
            ephemeris: keychain.ephemeris(),
            link: keychain.link(),
            location,
            notifier,
            default_peer: String::from(default_peer),
        }
    }

    pub fn bearing(&self) -> Option<Bearing> { self.bearing }

    pub fn last_record(&self) -> Option<&CelestialRecord> { self.last_record.as_ref() }

    /// Processes `events` until the sender is dropped or `c_tok` is cancelled.
    ///
    /// Starts the link worker on entry and shuts it down on exit, which
    /// cancels any pending connect and releases the link.
    pub async fn run(mut self, mut events: mpsc::Receiver<ControllerEvent>, c_tok: CancellationToken) -> Self {
        let (worker, mut link_events) = LinkWorker::start(Arc::clone(&self.link), c_tok.child_token());
        let (report_tx, mut report_rx) = mpsc::channel(Self::REPORT_DEPTH);
        info!("Alignment controller started, tracking {}", self.ephemeris.target());

        loop {
            tokio::select! {
                biased;
                () = c_tok.cancelled() => break,
                Some(ev) = link_events.recv() => self.on_link_event(ev),
                Some(report) = report_rx.recv() => self.on_report(report),
                ev = events.recv() => match ev {
                    Some(ev) => self.on_event(ev, &worker, &report_tx, &c_tok).await,
                    None => break,
                },
            }
        }

        worker.shutdown().await;
        log!("Alignment controller stopped");
        self
    }

    async fn on_event(
        &mut self,
        ev: ControllerEvent,
        worker: &LinkWorker,
        report_tx: &mpsc::Sender<QueryReport>,
        c_tok: &CancellationToken,
    ) {
        match ev {
            ControllerEvent::Sample(sample) => self.on_sample(sample),
            ControllerEvent::Align => self.request_alignment(report_tx, c_tok),
            ControllerEvent::Transmit => self.transmit(worker),
            ControllerEvent::Connect(peer) => {
                let peer_name = peer.unwrap_or_else(|| self.default_peer.clone());
                if let Err(e) = worker.submit(LinkCommand::Connect(peer_name)) {
                    self.notify_error(&e.into());
                }
            }
            ControllerEvent::Disconnect => worker.close().await,
        }
    }

    fn on_sample(&mut self, sample: SensorSample) {
        if let Some(bearing) = self.estimator.update(sample) {
            if self.bearing != Some(bearing) {
                event!("Bearing {bearing}");
            }
            self.bearing = Some(bearing);
        }
    }

    /// Spawns a lookup for the current time and location under a fresh sequence number.
    fn request_alignment(&mut self, report_tx: &mpsc::Sender<QueryReport>, c_tok: &CancellationToken) {
        let seq = self.tracker.issue();
        let ephemeris = Arc::clone(&self.ephemeris);
        let location = Arc::clone(&self.location);
        let report_tx = report_tx.clone();
        let c_tok = c_tok.clone();
        event!("Issuing ephemeris lookup #{seq}");
        tokio::spawn(async move {
            let lookup = async {
                let fix = location.last_fix().await?;
                let query = EphemerisQuery::at(&Local::now(), fix.latitude(), fix.longitude());
                Ok::<_, AlignmentError>(ephemeris.query(&query).await?)
            };
            tokio::select! {
                () = c_tok.cancelled() => {}
                result = lookup => {
                    // the controller may already be gone
                    let _ = report_tx.send(QueryReport { seq, result }).await;
                }
            }
        });
    }

    fn on_report(&mut self, report: QueryReport) {
        if !self.tracker.is_latest(report.seq) {
            event!("Discarding stale ephemeris response #{}", report.seq);
            return;
        }
        match report.result {
            Ok(record) => {
                let heading = self.bearing.map_or_else(|| String::from("n/a"), |b| b.to_string());
                self.notifier.notify(&format!("{record}, heading={heading}"));
                self.last_record = Some(record);
            }
            Err(e) => self.notify_error(&e),
        }
    }

    fn transmit(&self, worker: &LinkWorker) {
        let Some(bearing) = self.bearing else {
            self.notify_error(&AlignmentError::BearingUnavailable);
            return;
        };
        if let Err(e) = worker.submit(LinkCommand::Send(bearing.to_frame())) {
            self.notify_error(&e.into());
        }
    }

    fn on_link_event(&self, ev: LinkEvent) {
        match ev {
            LinkEvent::Connected { peer_name } => {
                self.notifier.notify(&format!("Connected to {peer_name}"));
            }
            LinkEvent::Sent { payload } => {
                self.notifier.notify(&format!("Data sent: {}", String::from_utf8_lossy(&payload)));
            }
            LinkEvent::Failed { error } => self.notify_error(&error.into()),
        }
    }

    fn notify_error(&self, error: &AlignmentError) { self.notifier.notify(&error.to_string()); }
}
