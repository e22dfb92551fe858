use std::fmt::{Display, Formatter};

use rand::{rngs::OsRng, RngCore};

/// Opaque identifier of a persisted session.
///
/// Generated keys are 32 random bytes, base32 encoded with the padding stripped,
/// so they only ever contain `A-Z` and `2-7`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SessionKey(String);

impl Display for SessionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SessionKey {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(data_encoding::BASE32_NOPAD.encode(&bytes))
    }

    /// Wraps a key recovered from a cookie. Empty values are rejected.
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SessionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
