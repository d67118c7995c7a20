use crate::config::SkyConfig;
use crate::ephemeris::EphemerisClient;
use crate::http_handler::http_client::HTTPClient;
use crate::serial_link::{RadioAdapter, SerialLink};
use std::sync::Arc;

/// The long-lived service handles shared by the controller and its tasks.
#[derive(Clone)]
pub struct Keychain {
    /// The HTTP client for the ephemeris service.
    client: Arc<HTTPClient>,
    /// The ephemeris lookup for the tracked body.
    ephemeris: Arc<EphemerisClient>,
    /// The serial link to the actuator.
    link: Arc<SerialLink>,
}

impl Keychain {
    /// Builds all service handles from the runtime configuration.
    ///
    /// # Errors
    /// Returns the underlying `reqwest::Error` if the HTTP client cannot be initialized.
    pub fn new(config: &SkyConfig, adapter: Arc<dyn RadioAdapter>) -> Result<Self, reqwest::Error> {
        let client = Arc::new(HTTPClient::new(config.ephemeris_url(), config.http_timeout())?);
        Ok(Self::from_parts(client, config.target_body(), adapter, config))
    }

    /// Assembles a keychain around an already built HTTP client.
    pub fn from_parts(
        client: Arc<HTTPClient>,
        target_body: &str,
        adapter: Arc<dyn RadioAdapter>,
        config: &SkyConfig,
    ) -> Self {
        let ephemeris = Arc::new(EphemerisClient::new(Arc::clone(&client), target_body));
        let link = Arc::new(SerialLink::new(adapter, config.connect_timeout()));
        Self { client, ephemeris, link }
    }

    /// Provides a cloned reference to the HTTP client.
    pub fn client(&self) -> Arc<HTTPClient> { Arc::clone(&self.client) }

    /// Provides a cloned reference to the ephemeris client.
    pub fn ephemeris(&self) -> Arc<EphemerisClient> { Arc::clone(&self.ephemeris) }

    /// Provides a cloned reference to the serial link.
    pub fn link(&self) -> Arc<SerialLink> { Arc::clone(&self.link) }
}
