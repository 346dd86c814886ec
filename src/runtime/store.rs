//! The store: state cell, serialized reduction loop and effect scheduler.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::action::Action;
use super::cancellation::{CancellationRegistry, ScopeId};
use super::effect::{Effect, EffectId, Operation, Sender};
use super::reducer::Reducer;
use super::scope::ScopedBacking;
use super::state::FeatureState;

pub(super) type Observer<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Bookkeeping shared by a root store and every scope derived from it.
pub(super) struct RuntimeShared {
    pub(super) registry: CancellationRegistry,
    /// Actions enqueued but not yet reduced.
    pending: AtomicUsize,
}

/// Storage-independent view of a store, implemented by the root and by
/// scoped projections.
pub(super) trait Backing<S, A>: Send + Sync {
    /// Run `f` against the current state. Called exactly once.
    fn read(&self, f: &mut dyn FnMut(&S));
    /// Forward `action` to the root; `owners` lists the scopes it passed through.
    fn dispatch(&self, action: A, owners: Vec<ScopeId>);
    /// Register `observer` where it is actually stored; the returned
    /// subscription removes it from there, whatever happens to `self`.
    fn subscribe(&self, observer: Observer<S>) -> Subscription;
    fn shared(&self) -> Arc<RuntimeShared>;
}

struct Envelope<A> {
    action: A,
    owners: Arc<[ScopeId]>,
    /// Set for actions produced by an effect, so they can be dropped if the
    /// effect is cancelled before they are reduced.
    token: Option<CancellationToken>,
}

struct RootCore<R: Reducer> {
    this: Weak<RootCore<R>>,
    reducer: R,
    state: RwLock<R::State>,
    queue: Mutex<VecDeque<Envelope<R::Action>>>,
    draining: AtomicBool,
    observers: Mutex<Vec<(u64, Observer<R::State>)>>,
    next_observer: AtomicU64,
    shared: Arc<RuntimeShared>,
    runtime: Handle,
}

/// Resets the loop-owner flag even if a reducer or observer panics.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<R: Reducer> RootCore<R> {
    fn enqueue(&self, envelope: Envelope<R::Action>) {
        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        self.queue.lock().push_back(envelope);
    }

    /// Reduce queued actions until the queue is empty.
    ///
    /// Only one caller owns the loop at a time; any other `send` (reentrant
    /// or from another thread) just enqueues and returns.
    fn drain(&self) {
        loop {
            if self
                .draining
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return;
            }
            {
                let _guard = DrainGuard(&self.draining);
                loop {
                    let next = self.queue.lock().pop_front();
                    let Some(envelope) = next else {
                        break;
                    };
                    self.process(envelope);
                    self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                }
            }
            // An action may have been enqueued after the last pop but before
            // the flag was released.
            if self.queue.lock().is_empty() {
                return;
            }
        }
    }

    fn process(&self, envelope: Envelope<R::Action>) {
        let Envelope {
            action,
            owners,
            token,
        } = envelope;

        if token.as_ref().is_some_and(CancellationToken::is_cancelled) {
            tracing::trace!(action = ?action, "dropping action from cancelled effect");
            return;
        }

        tracing::debug!(action = ?action, "reducing action");
        let (changed, effect) = {
            let mut state = self.state.write();
            let before = state.clone();
            let effect = self.reducer.reduce(&mut *state, action);
            (*state != before, effect)
        };

        if changed {
            self.notify();
        } else {
            tracing::trace!("state unchanged, observers not notified");
        }
        self.schedule(effect, &owners);
    }

    fn notify(&self) {
        let observers: Vec<Observer<R::State>> = self
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        let state = self.state.read_recursive();
        for observer in observers {
            observer(&*state);
        }
    }

    fn schedule(&self, effect: Effect<R::Action>, owners: &Arc<[ScopeId]>) {
        if effect.is_none() {
            return;
        }
        let mut superseded = Vec::new();
        collect_run_ids(&effect, &mut superseded);
        for id in &superseded {
            self.shared.registry.cancel(id);
        }
        self.start(effect, owners);
    }

    fn start(&self, effect: Effect<R::Action>, owners: &Arc<[ScopeId]>) {
        match effect {
            Effect::None => {}
            Effect::Send(action) => self.enqueue(Envelope {
                action,
                owners: Arc::clone(owners),
                token: None,
            }),
            Effect::Run { id, operation } => self.spawn(id, operation, owners),
            Effect::Cancel(id) => {
                self.shared.registry.cancel(&id);
            }
            Effect::Merge(effects) => {
                for effect in effects {
                    self.start(effect, owners);
                }
            }
        }
    }

    fn spawn(&self, id: Option<EffectId>, operation: Operation<R::Action>, owners: &Arc<[ScopeId]>) {
        let core = self.this.clone();
        let shared = Arc::clone(&self.shared);
        let owners = Arc::clone(owners);
        let runtime = &self.runtime;

        self.shared
            .registry
            .start(id, Arc::clone(&owners), move |serial, token| {
                let sink_token = token.clone();
                let sender = Sender::new(
                    move |action| {
                        // The store may already be gone; its effects then
                        // have nowhere to deliver to.
                        if let Some(core) = core.upgrade() {
                            core.enqueue(Envelope {
                                action,
                                owners: Arc::clone(&owners),
                                token: Some(sink_token.clone()),
                            });
                            core.drain();
                        }
                    },
                    token,
                );
                runtime.spawn(async move {
                    operation(sender).await;
                    shared.registry.finish(serial);
                })
            });
    }
}

fn collect_run_ids<A>(effect: &Effect<A>, ids: &mut Vec<EffectId>) {
    match effect {
        Effect::Run { id: Some(id), .. } if !ids.contains(id) => ids.push(id.clone()),
        Effect::Merge(effects) => {
            for effect in effects {
                collect_run_ids(effect, ids);
            }
        }
        _ => {}
    }
}

impl<R: Reducer> Drop for RootCore<R> {
    fn drop(&mut self) {
        let cancelled = self.shared.registry.cancel_all();
        tracing::info!(cancelled, "store torn down");
    }
}

impl<R: Reducer> Backing<R::State, R::Action> for RootCore<R> {
    fn read(&self, f: &mut dyn FnMut(&R::State)) {
        f(&*self.state.read_recursive());
    }

    fn dispatch(&self, action: R::Action, owners: Vec<ScopeId>) {
        self.enqueue(Envelope {
            action,
            owners: owners.into(),
            token: None,
        });
        self.drain();
    }

    fn subscribe(&self, observer: Observer<R::State>) -> Subscription {
        let observer_id = self.next_observer.fetch_add(1, Ordering::Relaxed);
        self.observers.lock().push((observer_id, observer));

        let core = self.this.clone();
        Subscription::new(move || {
            if let Some(core) = core.upgrade() {
                core.observers.lock().retain(|(id, _)| *id != observer_id);
            }
        })
    }

    fn shared(&self) -> Arc<RuntimeShared> {
        Arc::clone(&self.shared)
    }
}

/// Handle to a store.
///
/// A store created with [`Store::new`] owns the state; one created with
/// [`Store::scope`] is a view onto a slice of its parent's state. Clones share
/// the same underlying store. When the last handle of the root is dropped,
/// every in-flight effect is cancelled; when the last handle of a scope is
/// dropped, the effects started by actions sent through that scope are.
pub struct Store<S, A> {
    backing: Arc<dyn Backing<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            backing: Arc::clone(&self.backing),
        }
    }
}

impl<S: FeatureState, A: Action> Store<S, A> {
    /// Create a root store.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime; use
    /// [`Store::with_runtime`] to pass a handle explicitly.
    pub fn new<R>(initial_state: S, reducer: R) -> Self
    where
        R: Reducer<State = S, Action = A>,
    {
        Self::with_runtime(initial_state, reducer, Handle::current())
    }

    /// Create a root store whose effects run on `runtime`.
    pub fn with_runtime<R>(initial_state: S, reducer: R, runtime: Handle) -> Self
    where
        R: Reducer<State = S, Action = A>,
    {
        let core = Arc::new_cyclic(|this| RootCore {
            this: this.clone(),
            reducer,
            state: RwLock::new(initial_state),
            queue: Mutex::new(VecDeque::new()),
            draining: AtomicBool::new(false),
            observers: Mutex::new(Vec::new()),
            next_observer: AtomicU64::new(0),
            shared: Arc::new(RuntimeShared {
                registry: CancellationRegistry::new(),
                pending: AtomicUsize::new(0),
            }),
            runtime,
        });
        Self { backing: core }
    }

    pub(super) fn from_backing(backing: Arc<dyn Backing<S, A>>) -> Self {
        Self { backing }
    }

    /// Send an action through the reducer.
    ///
    /// When no reduction is in progress the action is reduced, the state
    /// committed and observers notified before this returns. Otherwise it is
    /// queued behind the reduction in progress.
    pub fn send(&self, action: A) {
        self.backing.dispatch(action, Vec::new());
    }

    /// Borrow the current state for the duration of `f`.
    ///
    /// `f` must not block on this store's effects.
    pub fn with_state<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        let mut f = Some(f);
        let mut out = None;
        self.backing.read(&mut |state| {
            if let Some(f) = f.take() {
                out = Some(f(state));
            }
        });
        out.expect("store read callback not invoked")
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> S {
        self.with_state(S::clone)
    }

    /// Register an observer called after every state change.
    ///
    /// Observation stops when the returned [`Subscription`] is dropped.
    pub fn observe(&self, observer: impl Fn(&S) + Send + Sync + 'static) -> Subscription {
        self.backing.subscribe(Arc::new(observer))
    }

    /// Derive a store focused on one slice of this store's state.
    ///
    /// Reads go through `get` on the parent's current state; actions sent to
    /// the child are wrapped with `embed` and reduced by the root.
    pub fn scope<C, CA>(
        &self,
        get: impl Fn(&S) -> &C + Send + Sync + 'static,
        embed: impl Fn(CA) -> A + Send + Sync + 'static,
    ) -> Store<C, CA>
    where
        C: FeatureState,
        CA: Action,
    {
        let backing = ScopedBacking::new(Arc::clone(&self.backing), Arc::new(get), Arc::new(embed));
        Store::from_backing(Arc::new(backing))
    }

    /// Number of effect tasks currently running for the whole store tree.
    pub fn in_flight_effects(&self) -> usize {
        self.backing.shared().registry.len()
    }

    /// Whether an effect with `id` is currently running.
    pub fn is_effect_active(&self, id: &EffectId) -> bool {
        self.backing.shared().registry.is_active(id)
    }

    /// Resolves once no effect is running and every queued action was reduced.
    pub async fn wait_for_effects(&self) {
        let shared = self.backing.shared();
        loop {
            shared.registry.wait_idle().await;
            if shared.registry.is_empty() && shared.pending.load(Ordering::Acquire) == 0 {
                return;
            }
            tokio::task::yield_now().await;
        }
    }
}

/// Keeps an observer registered until dropped.
#[must_use = "dropping a Subscription stops observation"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(remove: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

    /// Stop observing now.
    pub fn cancel(mut self) {
        self.unsubscribe();
    }

    fn unsubscribe(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
