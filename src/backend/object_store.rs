use std::time::Duration;

use crate::backend::BackendError;

/// A namespaced object store reached through pooled handles.
pub trait ObjectStore: Send + Sync {
    type Handle: ObjectHandle;

    /// Takes a handle from the pool without waiting. `None` means the backend is
    /// unavailable: the pool is exhausted or closed.
    fn session(&self) -> Option<Self::Handle>;

    /// Closes the pool. Handles already taken stay usable; no new ones are handed out.
    fn close(&self);
}

#[async_trait::async_trait]
pub trait ObjectHandle: Send {
    /// Writes `value` under `key`, replacing any previous object. A zero `ttl` keeps the
    /// object until it is deleted.
    async fn store(
        &mut self,
        bucket: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), BackendError>;

    async fn fetch(&mut self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>, BackendError>;

    /// Deleting a missing key succeeds.
    async fn delete(&mut self, bucket: &str, key: &str) -> Result<(), BackendError>;
}
