use super::celestial_record::{CelestialRecord, EphemerisQuery};
use crate::event;
use crate::http_handler::{
    common::HTTPError,
    http_client::HTTPClient,
    http_request::{celnav_get::CelNavRequest, request_common::{NoBodyHTTPRequestType, RequestError}},
    http_response::{celnav::CelNavObject, response_common::ResponseError},
};
use std::sync::Arc;
use strum_macros::Display;

/// Failure of a single ephemeris lookup. The `Display` text is the user-facing message.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum QueryError {
    #[strum(to_string = "API Error: {status_code}")]
    ServiceError { status_code: u16 },
    #[strum(to_string = "{name} data not found!")]
    BodyNotFound { name: String },
    #[strum(to_string = "API Call Failed: {cause}")]
    TransportError { cause: String },
}

impl std::error::Error for QueryError {}

impl From<HTTPError> for QueryError {
    fn from(value: HTTPError) -> Self {
        match value {
            HTTPError::HTTPRequestError { error: RequestError::Transport { cause } }
            | HTTPError::HTTPResponseError {
                error: ResponseError::Transport { cause } | ResponseError::Decode { cause },
            } => QueryError::TransportError { cause },
            HTTPError::HTTPResponseError { error: ResponseError::Status { status_code } } => {
                QueryError::ServiceError { status_code }
            }
        }
    }
}

/// Queries the ephemeris service and picks the tracked body out of the catalog.
///
/// Every call is one blocking network round trip; callers run it on its own task.
#[derive(Debug)]
pub struct EphemerisClient {
    client: Arc<HTTPClient>,
    target: String,
}

impl EphemerisClient {
    /// Creates a client selecting `target` (exact, case-sensitive name) from each response.
    pub(crate) fn new(client: Arc<HTTPClient>, target: &str) -> Self {
        Self { client, target: String::from(target) }
    }

    pub fn target(&self) -> &str { &self.target }

    /// Performs the lookup described by `query`.
    ///
    /// # Errors
    /// * [`QueryError::ServiceError`] on a non-success status code.
    /// * [`QueryError::BodyNotFound`] if no catalog entry carries the target name.
    /// * [`QueryError::TransportError`] on network failure or an unreadable body.
    pub async fn query(&self, query: &EphemerisQuery) -> Result<CelestialRecord, QueryError> {
        let request = CelNavRequest {
            date: query.date_param(),
            time: query.time_param(),
            coords: query.coords_param(),
        };
        event!("Querying {} for {} {} at {}", self.client.url(), request.date, request.time, request.coords);
        let response = request.send_request(&self.client).await?;
        Self::select_body(response.into_objects(), &self.target)
    }

    /// First exact match wins; duplicate names are not validated.
    fn select_body(objects: Vec<CelNavObject>, target: &str) -> Result<CelestialRecord, QueryError> {
        objects
            .into_iter()
            .find(|o| o.name() == target)
            .map(|o| CelestialRecord::new(o.name(), o.hc(), o.zn()))
            .ok_or_else(|| QueryError::BodyNotFound { name: String::from(target) })
    }
}
