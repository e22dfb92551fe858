#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend connection error: {0}")]
    Connection(String),
    #[error("Backend query error: {0}")]
    Query(String),
}
