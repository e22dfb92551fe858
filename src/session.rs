use serde::{de::DeserializeOwned, Serialize};

use crate::{
    session_cookie::CookieOptions,
    session_state::SessionState,
    storage::{Storage, StorageError, StorageGetError, StorageInsertError},
    SessionKey,
};

/// One session as seen by a single request.
///
/// A session starts out new and without a key. The key is assigned the first time the
/// session is saved and never changes afterwards.
#[derive(Clone, Debug)]
pub struct Session {
    id: Option<SessionKey>,
    name: String,
    state: SessionState,
    options: CookieOptions,
    is_new: bool,
}

impl Session {
    pub fn new(name: impl Into<String>, options: CookieOptions) -> Self {
        Session {
            id: None,
            name: name.into(),
            state: SessionState::default(),
            options,
            is_new: true,
        }
    }

    pub fn id(&self) -> Option<&SessionKey> {
        self.id.as_ref()
    }

    pub(crate) fn set_id(&mut self, id: SessionKey) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    /// Assigns a fresh key unless one is already set, and returns the key.
    pub(crate) fn ensure_id(&mut self) -> &SessionKey {
        self.id.get_or_insert_with(SessionKey::generate)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    pub fn options(&self) -> &CookieOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut CookieOptions {
        &mut self.options
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub(crate) fn set_is_new(&mut self, is_new: bool) {
        self.is_new = is_new;
    }

    /// Seconds the session should live. Zero uses the store default, a negative value
    /// deletes the session on the next save.
    pub fn set_max_age(&mut self, max_age: i64) {
        self.options.max_age = max_age;
    }

    /// Marks the session for deletion on the next save.
    pub fn destroy(&mut self) {
        self.options.max_age = -1;
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }
}

impl Storage<&str> for Session {
    type Error = StorageError;

    fn insert<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), Self::Error> {
        let insert = serde_json::to_string(value)
            .map_err(|e| StorageInsertError::SerializeError(key.to_string(), e.to_string()))
            .map_err(StorageError::from)?;
        self.state.insert(key, insert);
        Ok(())
    }

    fn remove<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, Self::Error> {
        self.state
            .remove(key)
            .map(|v| serde_json::from_str(&v))
            .transpose()
            .map_err(|e| StorageGetError::DeserializeError(key.to_string(), e.to_string()))
            .map_err(StorageError::from)
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Self::Error> {
        self.state
            .get(key)
            .map(|v| serde_json::from_str(v))
            .transpose()
            .map_err(|e| StorageGetError::DeserializeError(key.to_string(), e.to_string()))
            .map_err(StorageError::from)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.state.contains_key(key)
    }
}
