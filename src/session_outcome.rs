use std::error::Error;

use crate::{codec::CodecError, session_store::StoreError};

/// How [`Store::new_session`](crate::Store::new_session) arrived at its session.
///
/// Every variant except `Resumed` hands back a new, empty session. The request can go on
/// either way; the variants only tell why nothing was resumed.
#[derive(Debug)]
pub enum SessionOutcome {
    /// No cookie, or the cookie names a session the backend no longer has.
    New,
    Resumed,
    /// The cookie failed to decode: forged, signed with an unknown key, or expired.
    Tampered(CodecError),
    /// The backend could not be reached or failed the read.
    Unavailable(StoreError),
    /// The backend returned data that could not be deserialized.
    Corrupt(StoreError),
}

impl SessionOutcome {
    pub fn is_resumed(&self) -> bool {
        matches!(self, Self::Resumed)
    }

    pub fn diagnostic(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::New | Self::Resumed => None,
            Self::Tampered(e) => Some(e),
            Self::Unavailable(e) | Self::Corrupt(e) => Some(e),
        }
    }
}
