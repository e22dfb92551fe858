use std::{
    ops::{Deref, DerefMut},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A bounded set of connections shared by concurrent requests.
///
/// At most `size` [`Pooled`] handles exist at once. Connections are handed out
/// round-robin, so several handles may share one multiplexed connection.
pub struct Pool<C> {
    connections: Vec<C>,
    next: AtomicUsize,
    permits: Arc<Semaphore>,
}

impl<C: Clone> Pool<C> {
    pub fn new(connections: Vec<C>, size: usize) -> Self {
        Self {
            connections,
            next: AtomicUsize::new(0),
            permits: Arc::new(Semaphore::new(size)),
        }
    }

    /// Returns immediately with `None` when every slot is taken or the pool is closed.
    pub fn acquire(&self) -> Option<Pooled<C>> {
        if self.connections.is_empty() {
            return None;
        }
        let permit = Arc::clone(&self.permits).try_acquire_owned().ok()?;
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let connection = self.connections.get(index)?.clone();
        Some(Pooled {
            connection,
            _permit: permit,
        })
    }

    pub fn close(&self) {
        self.permits.close();
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

/// A connection taken from a [`Pool`]. Dropping it frees the slot.
pub struct Pooled<C> {
    connection: C,
    _permit: OwnedSemaphorePermit,
}

impl<C> Deref for Pooled<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}

impl<C> DerefMut for Pooled<C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.connection
    }
}
