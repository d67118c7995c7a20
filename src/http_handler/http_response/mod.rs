pub(crate) mod celnav;
pub(crate) mod response_common;
