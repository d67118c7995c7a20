use std::time::Duration;

/// A simple wrapper around `reqwest::Client` used to manage HTTP requests
/// with a preconfigured base URL and default settings.
///
/// This client is used for making REST API calls to the ephemeris service.
#[derive(Debug)]
pub(crate) struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
    /// Base URL for the API, prepended to all endpoint paths.
    base_url: String,
}

impl HTTPClient {
    /// Constructs a new `HTTPClient` with the given base URL and request timeout.
    ///
    /// # Arguments
    /// * `base_url` – The root URL for all HTTP requests (e.g., `"https://aa.usno.navy.mil"`).
    /// * `timeout` – Upper bound for a single request, connect to body.
    ///
    /// # Returns
    /// A configured `HTTPClient` instance or the builder error.
    pub(crate) fn new(base_url: &str, timeout: Duration) -> Result<HTTPClient, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Wraps an already configured `reqwest::Client`.
    pub(crate) fn with_client(base_url: &str, client: reqwest::Client) -> HTTPClient {
        HTTPClient { client, base_url: String::from(base_url.trim_end_matches('/')) }
    }

    /// Returns a reference to the internal `reqwest::Client`.
    pub(super) fn client(&self) -> &reqwest::Client { &self.client }
    /// Returns the base URL that the client was initialized with.
    pub(crate) fn url(&self) -> &str { self.base_url.as_str() }
}
