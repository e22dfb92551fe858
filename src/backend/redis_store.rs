mod commands;

use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::debug;

use crate::backend::{BackendError, ObjectHandle, ObjectStore, Pool, Pooled};
use commands::Command;

/// Object store on top of one or more Redis servers.
///
/// Buckets are key prefixes: an object `key` in `bucket` lives at `bucket:key`.
pub struct RedisObjectStore {
    pool: Pool<ConnectionManager>,
}

impl RedisObjectStore {
    /// Dials every address up front; the first failure is returned.
    pub async fn connect(addresses: &[String], pool_size: usize) -> Result<Self, BackendError> {
        if addresses.is_empty() {
            return Err(BackendError::Connection(
                "no backend addresses given".to_string(),
            ));
        }
        let mut connections = Vec::with_capacity(addresses.len());
        for address in addresses {
            let client = redis::Client::open(address.as_str())
                .map_err(|e| e.to_string())
                .map_err(BackendError::Connection)?;
            let connection = ConnectionManager::new(client)
                .await
                .map_err(|e| e.to_string())
                .map_err(BackendError::Connection)?;
            debug!(%address, "connected to redis");
            connections.push(connection);
        }
        Ok(Self {
            pool: Pool::new(connections, pool_size),
        })
    }
}

impl ObjectStore for RedisObjectStore {
    type Handle = RedisHandle;

    fn session(&self) -> Option<Self::Handle> {
        self.pool.acquire().map(RedisHandle)
    }

    fn close(&self) {
        self.pool.close();
    }
}

pub struct RedisHandle(Pooled<ConnectionManager>);

impl RedisHandle {
    async fn execute_command<T: redis::FromRedisValue>(
        &mut self,
        command: Command,
    ) -> Result<T, BackendError> {
        let redis_command: redis::Cmd = command.into();
        let result = redis_command
            .query_async(&mut *self.0)
            .await
            .map_err(|e| e.to_string())
            .map_err(BackendError::Query)?;
        Ok(result)
    }
}

fn cache_key(bucket: &str, key: &str) -> String {
    format!("{bucket}:{key}")
}

#[async_trait::async_trait]
impl ObjectHandle for RedisHandle {
    async fn store(
        &mut self,
        bucket: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), BackendError> {
        self.execute_command::<()>(Command::set(cache_key(bucket, key), value, ttl))
            .await
    }

    async fn fetch(&mut self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        self.execute_command::<Option<Vec<u8>>>(Command::get(cache_key(bucket, key)))
            .await
    }

    async fn delete(&mut self, bucket: &str, key: &str) -> Result<(), BackendError> {
        self.execute_command::<()>(Command::delete(cache_key(bucket, key)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addresses() -> Vec<String> {
        vec!["redis://:password@localhost:6379/1".to_string()]
    }

    #[tokio::test]
    async fn connect_fails_without_addresses() {
        let err = RedisObjectStore::connect(&[], 1)
            .await
            .err()
            .expect("expected connect to fail");
        assert!(matches!(err, BackendError::Connection(_)));
    }

    #[tokio::test]
    async fn connect_fails_for_an_invalid_address() {
        let result = RedisObjectStore::connect(&["not a url".to_string()], 1).await;
        assert!(matches!(result, Err(BackendError::Connection(_))));
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn fetch_returns_the_stored_value() {
        let store = RedisObjectStore::connect(&addresses(), 2)
            .await
            .expect("Unable to connect to Redis");
        let mut handle = store.session().expect("Unable to get handle");
        handle
            .store("sessions", "session_A", b"data".to_vec(), Duration::from_secs(10))
            .await
            .expect("Unable to store");
        let value = handle
            .fetch("sessions", "session_A")
            .await
            .expect("Unable to fetch");
        assert_eq!(value, Some(b"data".to_vec()));
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn delete_removes_the_stored_value() {
        let store = RedisObjectStore::connect(&addresses(), 2)
            .await
            .expect("Unable to connect to Redis");
        let mut handle = store.session().expect("Unable to get handle");
        handle
            .store("sessions", "session_B", b"data".to_vec(), Duration::from_secs(10))
            .await
            .expect("Unable to store");
        handle
            .delete("sessions", "session_B")
            .await
            .expect("Unable to delete");
        handle
            .delete("sessions", "session_B")
            .await
            .expect("Unable to delete twice");
        let value = handle
            .fetch("sessions", "session_B")
            .await
            .expect("Unable to fetch");
        assert!(value.is_none());
    }
}
