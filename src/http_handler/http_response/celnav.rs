use super::response_common::SerdeJSONBodyHTTPResponseType;

/// Body of `GET /api/celnav`. Only the fields needed for body selection are kept;
/// everything else the service returns is ignored.
#[derive(serde::Deserialize, Debug)]
pub struct CelNavResponse {
    properties: CelNavProperties,
}

impl SerdeJSONBodyHTTPResponseType for CelNavResponse {}

impl CelNavResponse {
    pub fn into_objects(self) -> Vec<CelNavObject> { self.properties.data }
}

#[derive(serde::Deserialize, Debug)]
struct CelNavProperties {
    data: Vec<CelNavObject>,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct CelNavObject {
    almanac_data: AlmanacData,
    object: String,
}

impl CelNavObject {
    pub fn name(&self) -> &str { self.object.as_str() }
    /// Computed altitude in degrees.
    pub fn hc(&self) -> f64 { self.almanac_data.hc }
    /// Azimuth in degrees.
    pub fn zn(&self) -> f64 { self.almanac_data.zn }
}

#[derive(serde::Deserialize, Debug, Clone, Copy)]
struct AlmanacData {
    hc: f64,
    zn: f64,
}
