use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike};
use std::fmt::{Display, Formatter};

/// Parameters of a single ephemeris lookup. Built fresh for every query
/// from the latest location fix and the wall clock.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisQuery {
    date: NaiveDate,
    time: NaiveTime,
    latitude: f64,
    longitude: f64,
}

impl EphemerisQuery {
    pub fn new(date: NaiveDate, time: NaiveTime, latitude: f64, longitude: f64) -> Self {
        Self { date, time, latitude, longitude }
    }

    /// Builds a query for the local date and minute of `now` at the given position.
    /// Seconds are dropped, the service resolves to whole minutes.
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>, latitude: f64, longitude: f64) -> Self {
        let local = now.naive_local();
        let time = local.time().with_second(0).and_then(|t| t.with_nanosecond(0));
        Self::new(local.date(), time.unwrap_or(local.time()), latitude, longitude)
    }

    pub fn date(&self) -> NaiveDate { self.date }
    pub fn time(&self) -> NaiveTime { self.time }
    pub fn latitude(&self) -> f64 { self.latitude }
    pub fn longitude(&self) -> f64 { self.longitude }

    /// `YYYY-MM-DD`
    pub fn date_param(&self) -> String { self.date.format("%Y-%m-%d").to_string() }
    /// `HH:mm`, 24-hour clock
    pub fn time_param(&self) -> String { self.time.format("%H:%M").to_string() }
    /// `lat,lon`
    pub fn coords_param(&self) -> String { format!("{},{}", self.latitude, self.longitude) }
}

/// Position of one catalog body as returned by the ephemeris service.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialRecord {
    name: String,
    /// Computed altitude in degrees.
    altitude: f64,
    /// Azimuth in degrees.
    bearing: f64,
}

impl CelestialRecord {
    pub fn new(name: impl Into<String>, altitude: f64, bearing: f64) -> Self {
        Self { name: name.into(), altitude, bearing }
    }
    pub fn name(&self) -> &str { &self.name }
    pub fn altitude(&self) -> f64 { self.altitude }
    pub fn bearing(&self) -> f64 { self.bearing }
}

impl Display for CelestialRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: hc={}, zn={}", self.name, self.altitude, self.bearing)
    }
}
