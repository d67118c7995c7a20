#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod config;
mod console;
mod controller;
mod ephemeris;
mod http_handler;
mod keychain;
mod logger;
mod orientation;
mod serial_link;

use crate::config::SkyConfig;
use crate::console::ConsoleReader;
use crate::controller::{AlignmentController, ControllerEvent, LogNotifier, StaticLocation};
use crate::keychain::Keychain;
use crate::serial_link::TcpBridgeAdapter;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const EVENT_QUEUE_DEPTH: usize = 64;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    let config = SkyConfig::from_env();
    info!(
        "Starting sky-guide: ephemeris at {}, tracking {}, actuator {:?}",
        config.ephemeris_url(),
        config.target_body(),
        config.peer_name()
    );

    let adapter = Arc::new(TcpBridgeAdapter::new(config.radio_enabled(), config.peers().to_vec()));
    let keychain = Keychain::new(&config, adapter)
        .unwrap_or_else(|e| fatal!("Failed to initialize HTTP client: {e}"));
    let controller = AlignmentController::new(
        &keychain,
        Arc::new(StaticLocation::new(config.location())),
        Arc::new(LogNotifier),
        config.peer_name(),
    );

    let c_tok = CancellationToken::new();
    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    // the first lookup runs as soon as the location is known
    if event_tx.send(ControllerEvent::Align).await.is_err() {
        fatal!("Controller event queue closed before startup");
    }
    let console = tokio::spawn(ConsoleReader::stdin(event_tx).run(c_tok.clone()));

    controller.run(event_rx, c_tok.clone()).await;
    c_tok.cancel();
    if let Err(e) = console.await {
        warn!("Console task ended abnormally: {e}");
    }
    info!("Shut down");
}
