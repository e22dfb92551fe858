mod configuration;
mod registry;
mod store;

use http::header::InvalidHeaderValue;

use crate::{backend::BackendError, codec::CodecError};

pub use configuration::Configuration;
pub use registry::Registry;
pub use store::{RedisSessionStore, Store};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store error: no backend connection available")]
    Unavailable,
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("Store error: Unable to serialize or deserialize session: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Store error: max-age {0} cannot be stored, negative ages delete the session")]
    InvalidMaxAge(i64),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("Store error: Unable to build cookie header: {0}")]
    Header(#[from] InvalidHeaderValue),
}
