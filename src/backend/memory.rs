use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crate::backend::{BackendError, ObjectHandle, ObjectStore, Pool, Pooled};

struct Object {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Object {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.map_or(false, |at| at <= now)
    }
}

#[derive(Clone, Default)]
pub struct Objects(Arc<Mutex<HashMap<String, Object>>>);

impl Objects {
    fn with<T>(&self, f: impl FnOnce(&mut HashMap<String, Object>) -> T) -> Result<T, BackendError> {
        let mut objects = self
            .0
            .lock()
            .map_err(|e| BackendError::Query(e.to_string()))?;
        Ok(f(&mut objects))
    }
}

/// An in-process object store honouring TTLs, for tests and single-node setups.
pub struct MemoryObjectStore {
    pool: Pool<Objects>,
}

impl MemoryObjectStore {
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool: Pool::new(vec![Objects::default()], pool_size),
        }
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ObjectStore for MemoryObjectStore {
    type Handle = MemoryHandle;

    fn session(&self) -> Option<Self::Handle> {
        self.pool.acquire().map(MemoryHandle)
    }

    fn close(&self) {
        self.pool.close();
    }
}

pub struct MemoryHandle(Pooled<Objects>);

fn object_key(bucket: &str, key: &str) -> String {
    format!("{bucket}:{key}")
}

#[async_trait::async_trait]
impl ObjectHandle for MemoryHandle {
    async fn store(
        &mut self,
        bucket: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), BackendError> {
        let expires_at = (!ttl.is_zero()).then(|| Instant::now() + ttl);
        self.0.with(|objects| {
            objects.insert(object_key(bucket, key), Object { value, expires_at });
        })
    }

    async fn fetch(&mut self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        let key = object_key(bucket, key);
        let now = Instant::now();
        self.0.with(|objects| match objects.get(&key) {
            Some(object) if object.expired(now) => {
                objects.remove(&key);
                None
            }
            Some(object) => Some(object.value.clone()),
            None => None,
        })
    }

    async fn delete(&mut self, bucket: &str, key: &str) -> Result<(), BackendError> {
        self.0.with(|objects| {
            objects.remove(&object_key(bucket, key));
        })
    }
}
