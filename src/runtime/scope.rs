//! Scoped projections of a store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::action::Action;
use super::cancellation::ScopeId;
use super::state::FeatureState;
use super::store::{Backing, Observer, RuntimeShared, Subscription};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

type Getter<P, C> = Arc<dyn Fn(&P) -> &C + Send + Sync>;
type Embed<C, P> = Arc<dyn Fn(C) -> P + Send + Sync>;

/// A child view over a parent backing. Owns no state.
pub(super) struct ScopedBacking<PS, PA, S, A> {
    id: ScopeId,
    parent: Arc<dyn Backing<PS, PA>>,
    get: Getter<PS, S>,
    embed: Embed<A, PA>,
}

impl<PS, PA, S, A> ScopedBacking<PS, PA, S, A> {
    pub(super) fn new(parent: Arc<dyn Backing<PS, PA>>, get: Getter<PS, S>, embed: Embed<A, PA>) -> Self {
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(scope = id, "scope created");
        Self {
            id,
            parent,
            get,
            embed,
        }
    }
}

impl<PS, PA, S, A> Backing<S, A> for ScopedBacking<PS, PA, S, A>
where
    PS: FeatureState,
    PA: Action,
    S: FeatureState,
    A: Action,
{
    fn read(&self, f: &mut dyn FnMut(&S)) {
        let get = &self.get;
        self.parent.read(&mut |parent| f(get(parent)));
    }

    fn dispatch(&self, action: A, mut owners: Vec<ScopeId>) {
        owners.push(self.id);
        self.parent.dispatch((self.embed)(action), owners);
    }

    /// Child observers only hear about changes to their own slice.
    fn subscribe(&self, observer: Observer<S>) -> Subscription {
        let mut current = None;
        self.read(&mut |state| current = Some(state.clone()));
        let last = Mutex::new(current);
        let get = Arc::clone(&self.get);

        self.parent.subscribe(Arc::new(move |parent: &PS| {
            let child = get(parent);
            {
                let mut last = last.lock();
                if last.as_ref() == Some(child) {
                    return;
                }
                *last = Some(child.clone());
            }
            observer(child);
        }))
    }

    fn shared(&self) -> Arc<RuntimeShared> {
        self.parent.shared()
    }
}

impl<PS, PA, S, A> Drop for ScopedBacking<PS, PA, S, A> {
    fn drop(&mut self) {
        let cancelled = self.parent.shared().registry.cancel_owned_by(self.id);
        tracing::trace!(scope = self.id, cancelled, "scope torn down");
    }
}
