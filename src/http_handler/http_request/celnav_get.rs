use super::super::http_response::celnav::CelNavResponse;
use super::request_common::{HTTPRequestType, NoBodyHTTPRequestType};

/// Request type for the celestial navigation endpoint `GET /api/celnav`.
#[derive(Debug)]
pub(crate) struct CelNavRequest {
    /// Observation date, `YYYY-MM-DD`.
    pub(crate) date: String,
    /// Observation time, `HH:mm` (24-hour).
    pub(crate) time: String,
    /// Observer position, `lat,lon` in decimal degrees.
    pub(crate) coords: String,
}

impl NoBodyHTTPRequestType for CelNavRequest {}

impl HTTPRequestType for CelNavRequest {
    type Response = CelNavResponse;
    fn endpoint(&self) -> &'static str { "/api/celnav" }
    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("date", self.date.clone()),
            ("time", self.time.clone()),
            ("coords", self.coords.clone()),
        ]
    }
}
