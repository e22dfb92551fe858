//! The key-value backend sessions are persisted to.
//!
//! Backends hand out pooled [`ObjectHandle`]s. A handle holds its pool slot until it is
//! dropped, so every exit path of an operation gives the slot back.

mod error;
mod memory;
mod object_store;
mod pool;
mod redis_store;

pub use error::BackendError;
pub use memory::{MemoryHandle, MemoryObjectStore};
pub use object_store::{ObjectHandle, ObjectStore};
pub use pool::{Pool, Pooled};
pub use redis_store::{RedisHandle, RedisObjectStore};
