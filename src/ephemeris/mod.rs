//! Ephemeris lookup for the tracked celestial body.

mod celestial_record;
mod ephemeris_client;
#[cfg(test)]
pub(crate) mod tests;

pub use celestial_record::{CelestialRecord, EphemerisQuery};
pub use ephemeris_client::{EphemerisClient, QueryError};
