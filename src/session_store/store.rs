use std::time::Duration;

use http::HeaderMap;
use tracing::{debug, warn};

use crate::{
    backend::{ObjectHandle, ObjectStore, RedisObjectStore},
    codec::{Codec, CodecError, KeyRing},
    session::Session,
    session_cookie::{new_cookie, read_cookie, set_cookie},
    session_outcome::SessionOutcome,
    session_state::SessionState,
    session_store::{Configuration, StoreError},
    SessionKey,
};

/// Sessions persisted in an [`ObjectStore`], referenced by cookies protected with a
/// [`Codec`].
///
/// One store serves every request of the process. Sessions themselves belong to a single
/// request and are passed in by reference.
pub struct Store<B, C> {
    backend: B,
    codec: C,
    config: Configuration,
}

/// A store backed by Redis, with cookies protected by the configured key pairs.
pub type RedisSessionStore = Store<RedisObjectStore, KeyRing>;

impl Store<RedisObjectStore, KeyRing> {
    /// Builds the key ring and dials every configured address. Nothing is deferred: a
    /// store that cannot reach its backend is never returned.
    pub async fn connect(config: Configuration) -> Result<Self, StoreError> {
        let codec = KeyRing::from_pairs(&config.key_pairs)?;
        let backend = RedisObjectStore::connect(&config.addresses, config.pool_size).await?;
        Ok(Self::new(backend, codec, config))
    }
}

impl<B, C> Store<B, C>
where
    B: ObjectStore,
    C: Codec,
{
    pub fn new(backend: B, codec: C, config: Configuration) -> Self {
        Self {
            backend,
            codec,
            config,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Sets the max-age of new sessions' cookies and how long issued tokens decode.
    pub fn set_max_age(&mut self, max_age: i64) {
        self.config.options.max_age = max_age;
        self.codec.set_max_age(max_age);
    }

    pub fn close(&self) {
        self.backend.close();
    }

    /// Returns the session named `name` for a request.
    ///
    /// The session is resumed when the request carries a valid cookie for it and the
    /// backend still holds its data. Otherwise a new session comes back, and the outcome
    /// says why; none of these cases should fail the request.
    pub async fn new_session(&self, headers: &HeaderMap, name: &str) -> (Session, SessionOutcome) {
        let mut session = Session::new(name, self.config.options.clone());

        let Some(token) = read_cookie(headers, name) else {
            return (session, SessionOutcome::New);
        };
        let id = match self.codec.decode(name, &token) {
            Ok(id) => id,
            Err(e) => {
                warn!(cookie = %name, error = %e, "session cookie rejected");
                return (session, SessionOutcome::Tampered(e));
            }
        };
        let Some(id) = SessionKey::parse(id) else {
            warn!(cookie = %name, "session cookie decoded to an empty key");
            return (session, SessionOutcome::Tampered(CodecError::Encoding));
        };
        session.set_id(id);

        // On a failed read the entry may still hold data; saving under its key would
        // overwrite it, so the session starts over under a fresh key.
        let outcome = match self.load(&mut session).await {
            Ok(true) => SessionOutcome::Resumed,
            Ok(false) => SessionOutcome::New,
            Err(e @ StoreError::Serialization(_)) => {
                session.clear_id();
                SessionOutcome::Corrupt(e)
            }
            Err(e) => {
                session.clear_id();
                SessionOutcome::Unavailable(e)
            }
        };
        session.set_is_new(!outcome.is_resumed());
        (session, outcome)
    }

    /// Persists the session and sets its cookie on the response, or, for a session with
    /// a negative max-age, deletes it and expires the cookie.
    ///
    /// No cookie is set when the backend operation fails.
    pub async fn save_session(
        &self,
        response: &mut HeaderMap,
        session: &mut Session,
    ) -> Result<(), StoreError> {
        if session.options().max_age < 0 {
            self.delete(session).await?;
            let cookie = new_cookie(session.name(), "", session.options());
            set_cookie(response, &cookie)?;
            return Ok(());
        }

        let id = session.ensure_id().clone();
        self.save(session).await?;
        let encoded = self.codec.encode(session.name(), id.as_str())?;
        let cookie = new_cookie(session.name(), &encoded, session.options());
        set_cookie(response, &cookie)?;
        Ok(())
    }

    /// Writes the session's values to the backend, assigning a key first if the session
    /// has none. A negative effective max-age is rejected; use [`Store::delete`] instead.
    pub async fn save(&self, session: &mut Session) -> Result<(), StoreError> {
        let age = match session.options().max_age {
            0 => self.config.default_max_age,
            age => age,
        };
        let ttl = u64::try_from(age)
            .map(Duration::from_secs)
            .map_err(|_| StoreError::InvalidMaxAge(age))?;
        let body = serde_json::to_vec(session.state())?;
        let key = (self.config.key_gen())(session.ensure_id());
        let mut handle = self.handle()?;

        handle
            .store(&self.config.bucket, &key, body, ttl)
            .await?;
        debug!(%key, ttl = ttl.as_secs(), "session saved");
        Ok(())
    }

    /// Reads the session's values from the backend.
    ///
    /// `Ok(false)` means the backend holds nothing for the session. Data that is present
    /// but cannot be deserialized is an error, and leaves the session's values untouched.
    pub async fn load(&self, session: &mut Session) -> Result<bool, StoreError> {
        let Some(id) = session.id() else {
            return Ok(false);
        };
        let key = (self.config.key_gen())(id);
        let mut handle = self.handle()?;

        let data = handle.fetch(&self.config.bucket, &key).await?;
        let Some(data) = data.filter(|data| !data.is_empty()) else {
            debug!(%key, "no session data");
            return Ok(false);
        };
        let state = serde_json::from_slice::<SessionState>(&data).map_err(|e| {
            warn!(%key, error = %e, "stored session could not be deserialized");
            StoreError::Serialization(e)
        })?;
        session.set_state(state);
        Ok(true)
    }

    /// Removes the session's values from the backend. Deleting a session that was never
    /// stored succeeds.
    pub async fn delete(&self, session: &Session) -> Result<(), StoreError> {
        let Some(id) = session.id() else {
            return Ok(());
        };
        let key = (self.config.key_gen())(id);
        let mut handle = self.handle()?;
        handle.delete(&self.config.bucket, &key).await?;
        debug!(%key, "session deleted");
        Ok(())
    }

    fn handle(&self) -> Result<B::Handle, StoreError> {
        self.backend.session().ok_or_else(|| {
            warn!("no backend connection available");
            StoreError::Unavailable
        })
    }
}
