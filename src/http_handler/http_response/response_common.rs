use strum_macros::Display;

#[derive(Debug, Display)]
pub enum ResponseError {
    #[strum(to_string = "status {status_code}")]
    Status { status_code: u16 },
    #[strum(to_string = "malformed body: {cause}")]
    Decode { cause: String },
    #[strum(to_string = "{cause}")]
    Transport { cause: String },
}

impl std::error::Error for ResponseError {}

impl From<reqwest::Error> for ResponseError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            ResponseError::Decode { cause: value.to_string() }
        } else {
            ResponseError::Transport { cause: value.to_string() }
        }
    }
}

pub(crate) trait HTTPResponseType {
    type ParsedResponseType;
    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError>;

    async fn unwrap_return_code(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ResponseError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ResponseError::Status { status_code: response.status().as_u16() })
        }
    }
}

/// Marker for responses whose body is a JSON document deserialized straight into `Self`.
pub(crate) trait SerdeJSONBodyHTTPResponseType {}

impl<T> HTTPResponseType for T
where
    T: SerdeJSONBodyHTTPResponseType,
    for<'de> T: serde::Deserialize<'de>,
{
    type ParsedResponseType = T;

    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError> {
        let resp = Self::unwrap_return_code(response).await?;
        Ok(resp.json::<T>().await?)
    }
}
