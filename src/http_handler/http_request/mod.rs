pub(crate) mod celnav_get;
pub(crate) mod request_common;
