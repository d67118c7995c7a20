use async_trait::async_trait;
use strum_macros::Display;

/// A position fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    latitude: f64,
    longitude: f64,
}

impl LocationFix {
    pub fn new(latitude: f64, longitude: f64) -> Self { Self { latitude, longitude } }
    pub fn latitude(&self) -> f64 { self.latitude }
    pub fn longitude(&self) -> f64 { self.longitude }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[strum(to_string = "Failed to get location.")]
    Unavailable,
}

impl std::error::Error for LocationError {}

/// Source of the device's most recent position fix.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn last_fix(&self) -> Result<LocationFix, LocationError>;
}

/// A fixed, configured position. Reports [`LocationError::Unavailable`] when none is configured.
#[derive(Debug, Clone, Copy)]
pub struct StaticLocation {
    fix: Option<LocationFix>,
}

impl StaticLocation {
    pub fn new(fix: Option<LocationFix>) -> Self { Self { fix } }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn last_fix(&self) -> Result<LocationFix, LocationError> {
        self.fix.ok_or(LocationError::Unavailable)
    }
}
