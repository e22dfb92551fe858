use std::collections::{hash_map::Entry, HashMap};

use http::HeaderMap;
use tracing::warn;

use crate::{
    backend::ObjectStore,
    codec::Codec,
    session::Session,
    session_outcome::SessionOutcome,
    session_store::{Store, StoreError},
};

/// The sessions of one request, loaded at most once per name.
pub struct Registry<'a, B, C> {
    store: &'a Store<B, C>,
    sessions: HashMap<String, (Session, SessionOutcome)>,
}

impl<'a, B, C> Registry<'a, B, C>
where
    B: ObjectStore,
    C: Codec,
{
    pub fn new(store: &'a Store<B, C>) -> Self {
        Self {
            store,
            sessions: HashMap::new(),
        }
    }

    /// Returns the session called `name`, loading it on first use.
    pub async fn get(
        &mut self,
        headers: &HeaderMap,
        name: &str,
    ) -> (&mut Session, &SessionOutcome) {
        let entry = match self.sessions.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.store.new_session(headers, name).await),
        };
        (&mut entry.0, &entry.1)
    }

    /// Saves every session loaded so far. A failure does not stop the remaining saves;
    /// the first one is returned.
    pub async fn save_all(&mut self, response: &mut HeaderMap) -> Result<(), StoreError> {
        let mut first_error = None;
        for (session, _) in self.sessions.values_mut() {
            if let Err(e) = self.store.save_session(response, session).await {
                warn!(session = session.name(), error = %e, "unable to save session");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
