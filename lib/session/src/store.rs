//! The single process-wide session cell.
//!
//! `SessionStore` is a cheap-to-clone handle; every clone points at the same
//! cell. Reads are synchronous, observers subscribe to change notifications,
//! and writes are restricted to the bootstrap and login/logout flows in this
//! crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Notify, watch};
use tracing::debug;

use crate::state::SessionState;

/// Shared handle to the current [`SessionState`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    state: watch::Sender<SessionState>,
    closed: AtomicBool,
    closing: Notify,
}

impl SessionStore {
    /// Creates a store in the `Unknown` state.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self {
            inner: Arc::new(Inner {
                state,
                closed: AtomicBool::new(false),
                closing: Notify::new(),
            }),
        }
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Returns an observer that is notified after every state write.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Waits until the state is no longer `Unknown` and returns it.
    ///
    /// This is the "bootstrap complete" signal. If the store is torn down
    /// before bootstrap settles, the (still `Unknown`) state is returned.
    pub async fn settled(&self) -> SessionState {
        let mut observer = self.subscribe();
        tokio::select! {
            settled = observer.wait_for(SessionState::is_settled) => {
                match settled {
                    Ok(state) => state.clone(),
                    Err(_) => self.current(),
                }
            }
            () = self.closed() => self.current(),
        }
    }

    /// Replaces the state and notifies observers.
    ///
    /// Returns false, without writing, once the store has been torn down.
    pub(crate) fn set(&self, next: SessionState) -> bool {
        if self.is_closed() {
            debug!(
                discarded = next.label(),
                "session store torn down, ignoring state write"
            );
            return false;
        }

        let to = next.label();
        let previous = self.inner.state.send_replace(next);
        debug!(from = previous.label(), to, "session state written");
        true
    }

    /// Marks the store as torn down. Later writes are discarded.
    pub fn teardown(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            debug!("session store torn down");
            self.inner.closing.notify_waiters();
        }
    }

    /// Returns true once [`teardown`](Self::teardown) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Resolves once the store is torn down.
    pub async fn closed(&self) {
        let notified = self.inner.closing.notified();
        if self.is_closed() {
            return;
        }
        notified.await;
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
