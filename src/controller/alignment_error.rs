use super::location::LocationError;
use crate::ephemeris::QueryError;
use crate::serial_link::LinkError;
use strum_macros::Display;

/// Any failure surfaced to the user by the controller, shown verbatim.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum AlignmentError {
    #[strum(to_string = "{error}")]
    Link { error: LinkError },
    #[strum(to_string = "{error}")]
    Query { error: QueryError },
    #[strum(to_string = "{error}")]
    Location { error: LocationError },
    #[strum(to_string = "Heading not available yet")]
    BearingUnavailable,
}

impl std::error::Error for AlignmentError {}

impl From<LinkError> for AlignmentError {
    fn from(error: LinkError) -> Self { AlignmentError::Link { error } }
}

impl From<QueryError> for AlignmentError {
    fn from(error: QueryError) -> Self { AlignmentError::Query { error } }
}

impl From<LocationError> for AlignmentError {
    fn from(error: LocationError) -> Self { AlignmentError::Location { error } }
}
