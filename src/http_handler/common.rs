use super::http_request::request_common::RequestError;
use super::http_response::response_common::ResponseError;
use strum_macros::Display;

#[derive(Debug, Display)]
pub enum HTTPError {
    #[strum(to_string = "{error}")]
    HTTPRequestError { error: RequestError },
    #[strum(to_string = "{error}")]
    HTTPResponseError { error: ResponseError },
}

impl std::error::Error for HTTPError {}

impl From<RequestError> for HTTPError {
    fn from(error: RequestError) -> Self { HTTPError::HTTPRequestError { error } }
}

impl From<ResponseError> for HTTPError {
    fn from(error: ResponseError) -> Self { HTTPError::HTTPResponseError { error } }
}
