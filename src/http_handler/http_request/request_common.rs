use super::super::common::HTTPError;
use super::super::http_client::HTTPClient;
use super::super::http_response::response_common::HTTPResponseType;
use strum_macros::Display;

/// Failure while dispatching a request, before any response arrived.
#[derive(Debug, Display)]
pub enum RequestError {
    #[strum(to_string = "{cause}")]
    Transport { cause: String },
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self { RequestError::Transport { cause: value.to_string() } }
}

pub(crate) trait HTTPRequestType {
    /// Type of the expected response.
    type Response: HTTPResponseType;
    /// `str` object representing the specific endpoint.
    fn endpoint(&self) -> &str;
    /// The corresponding HTTP Request Method.
    fn request_method(&self) -> reqwest::Method { reqwest::Method::GET }
    /// URL query parameters, appended in order.
    fn query_params(&self) -> Vec<(&'static str, String)> { Vec::new() }
    /// Header parameters attached to the request.
    fn header_params(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers
    }
    fn request_url(&self, client: &HTTPClient) -> String {
        format!("{}{}", client.url(), self.endpoint())
    }
}

pub(crate) trait NoBodyHTTPRequestType: HTTPRequestType {
    async fn send_request(
        &self,
        client: &HTTPClient,
    ) -> Result<<Self::Response as HTTPResponseType>::ParsedResponseType, HTTPError> {
        let response = client
            .client()
            .request(self.request_method(), self.request_url(client))
            .headers(self.header_params())
            .query(&self.query_params())
            .send()
            .await
            .map_err(RequestError::from)?;
        Ok(Self::Response::read_response(response).await?)
    }
}
