//! Server-side sessions in a key-value backend, referenced by signed and encrypted
//! cookies.
//!
//! A [`Store`] loads a request's [`Session`] from the object named by its cookie and,
//! once the response is ready, writes the session back and reissues the cookie. The
//! cookie only ever carries the session key, protected by a [`Codec`]; the values stay
//! in the backend.

pub mod backend;
pub mod codec;
mod session;
mod session_cookie;
mod session_key;
mod session_outcome;
mod session_state;
mod session_store;
mod storage;

pub use backend::{BackendError, MemoryObjectStore, ObjectHandle, ObjectStore, RedisObjectStore};
pub use codec::{Codec, CodecError, KeyPair, KeyRing, SecureCookie};
pub use session::Session;
pub use session_cookie::{CookieOptions, DEFAULT_MAX_AGE};
pub use session_key::SessionKey;
pub use session_outcome::SessionOutcome;
pub use session_state::SessionState;
pub use session_store::{Configuration, RedisSessionStore, Registry, Store, StoreError};
pub use storage::{Storage, StorageError, StorageGetError, StorageInsertError};
