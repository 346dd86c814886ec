//! Registry of in-flight effects.
//!
//! Every running effect task is tracked here until it completes or is
//! cancelled. Entries remember the cancellation id they were started with
//! and the scopes whose actions started them, so that a new effect can
//! supersede an old one and a torn-down scope can stop its own work.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::{AbortHandle, JoinHandle};
use tokio_util::sync::CancellationToken;

use super::effect::EffectId;

/// Identifies a scoped store for effect ownership.
pub type ScopeId = u64;

struct Entry {
    id: Option<EffectId>,
    owners: Arc<[ScopeId]>,
    token: CancellationToken,
    abort: AbortHandle,
}

impl Entry {
    fn stop(self) {
        self.token.cancel();
        self.abort.abort();
    }
}

#[derive(Default)]
struct RegistryInner {
    next_serial: u64,
    running: HashMap<u64, Entry>,
}

/// Tracks running effects by serial number, cancellation id and owner.
#[derive(Default)]
pub struct CancellationRegistry {
    inner: Mutex<RegistryInner>,
    idle: Notify,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new effect task.
    ///
    /// `spawn` receives the serial the task must report to [`finish`] and
    /// the token it observes. The registry lock is held while spawning so a
    /// task that completes immediately cannot finish before it is recorded.
    ///
    /// [`finish`]: CancellationRegistry::finish
    pub fn start(
        &self,
        id: Option<EffectId>,
        owners: Arc<[ScopeId]>,
        spawn: impl FnOnce(u64, CancellationToken) -> JoinHandle<()>,
    ) -> u64 {
        let mut inner = self.inner.lock();
        let serial = inner.next_serial;
        inner.next_serial += 1;

        let token = CancellationToken::new();
        let handle = spawn(serial, token.clone());
        tracing::trace!(serial, id = ?id, "effect started");
        inner.running.insert(
            serial,
            Entry {
                id,
                owners,
                token,
                abort: handle.abort_handle(),
            },
        );
        serial
    }

    /// Called by a task when its operation ran to completion.
    pub fn finish(&self, serial: u64) {
        let mut inner = self.inner.lock();
        if inner.running.remove(&serial).is_some() {
            tracing::trace!(serial, "effect finished");
        }
        if inner.running.is_empty() {
            self.idle.notify_waiters();
        }
    }

    /// Cancel every running effect started with `id`.
    pub fn cancel(&self, id: &EffectId) -> usize {
        let cancelled = self.remove_where(|entry| entry.id.as_ref() == Some(id));
        if cancelled > 0 {
            tracing::debug!(id = %id, cancelled, "cancelled in-flight effects");
        }
        cancelled
    }

    /// Cancel every running effect started by an action sent through `scope`.
    pub fn cancel_owned_by(&self, scope: ScopeId) -> usize {
        let cancelled = self.remove_where(|entry| entry.owners.contains(&scope));
        if cancelled > 0 {
            tracing::debug!(scope, cancelled, "cancelled effects owned by scope");
        }
        cancelled
    }

    pub fn cancel_all(&self) -> usize {
        self.remove_where(|_| true)
    }

    pub fn is_active(&self, id: &EffectId) -> bool {
        self.inner
            .lock()
            .running
            .values()
            .any(|entry| entry.id.as_ref() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.inner.lock().running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves once no effect is running.
    pub async fn wait_idle(&self) {
        // Subscribe before checking, otherwise a finish between the check
        // and the await would be missed.
        let notified = self.idle.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_empty() {
            return;
        }
        notified.await;
    }

    fn remove_where(&self, mut predicate: impl FnMut(&Entry) -> bool) -> usize {
        let stopped: Vec<Entry> = {
            let mut inner = self.inner.lock();
            let serials: Vec<u64> = inner
                .running
                .iter()
                .filter(|(_, entry)| predicate(entry))
                .map(|(serial, _)| *serial)
                .collect();
            let stopped = serials
                .into_iter()
                .filter_map(|serial| inner.running.remove(&serial))
                .collect();
            if inner.running.is_empty() {
                self.idle.notify_waiters();
            }
            stopped
        };

        let count = stopped.len();
        for entry in stopped {
            entry.stop();
        }
        count
    }
}
