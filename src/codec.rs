//! Authenticated encoding of session identifiers into cookie values.
//!
//! A [`SecureCookie`] signs (and optionally encrypts) a value under one [`KeyPair`]. A
//! [`KeyRing`] holds several of them to support key rotation: new tokens are always
//! produced with the first pair, while tokens issued under older pairs still decode.

mod error;
mod key_ring;
mod secure_cookie;

use std::fmt::{Debug, Formatter};

pub use error::CodecError;
pub use key_ring::KeyRing;
pub use secure_cookie::SecureCookie;

/// Protects a cookie value against tampering and disclosure.
pub trait Codec: Send + Sync {
    /// Encodes `value` for the cookie called `name`.
    fn encode(&self, name: &str, value: &str) -> Result<String, CodecError>;

    /// Recovers a value produced by [`Codec::encode`] for the same `name`.
    ///
    /// Fails when the token was altered, was issued for another name or key, or is older
    /// than the codec allows.
    fn decode(&self, name: &str, token: &str) -> Result<String, CodecError>;

    /// Sets how long issued tokens stay valid, in seconds. Zero disables the check.
    fn set_max_age(&mut self, _max_age: i64) {}
}

/// Keys for one [`SecureCookie`].
///
/// The hash key authenticates tokens and is required. The optional block key, 16 or 32
/// bytes, additionally encrypts the value with AES-GCM.
#[derive(Clone)]
pub struct KeyPair {
    pub hash_key: Vec<u8>,
    pub block_key: Option<Vec<u8>>,
}

impl KeyPair {
    pub fn new(hash_key: impl Into<Vec<u8>>) -> Self {
        Self {
            hash_key: hash_key.into(),
            block_key: None,
        }
    }

    pub fn with_block_key(mut self, block_key: impl Into<Vec<u8>>) -> Self {
        self.block_key = Some(block_key.into());
        self
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("hash_key", &"[redacted]")
            .field("block_key", &self.block_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}
