//! Effect descriptions returned by reducers.
//!
//! An effect is a value: building one performs no work. The store executes
//! it after committing the state change that produced it, and every action
//! the effect yields re-enters the store through [`Sender::send`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_core::future::BoxFuture;
use tokio_util::sync::CancellationToken;

/// Key used to supersede or cancel in-flight effects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(String);

impl EffectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EffectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EffectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Asynchronous unit of work. Receives the sender it reports through.
pub type Operation<A> = Box<dyn FnOnce(Sender<A>) -> BoxFuture<'static, ()> + Send>;

/// Handle an effect operation uses to feed actions back into the store.
///
/// Once the effect is cancelled, `send` silently drops its argument.
pub struct Sender<A> {
    sink: Arc<dyn Fn(A) + Send + Sync>,
    token: CancellationToken,
}

impl<A> Clone for Sender<A> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            token: self.token.clone(),
        }
    }
}

impl<A: Send + 'static> Sender<A> {
    pub(crate) fn new(sink: impl Fn(A) + Send + Sync + 'static, token: CancellationToken) -> Self {
        Self {
            sink: Arc::new(sink),
            token,
        }
    }

    /// Deliver an action to the store that runs this effect.
    pub fn send(&self, action: A) {
        if self.token.is_cancelled() {
            return;
        }
        (self.sink)(action);
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves when the effect has been cancelled or its store torn down.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    fn contramap<B: Send + 'static>(&self, f: Arc<dyn Fn(B) -> A + Send + Sync>) -> Sender<B> {
        let sink = Arc::clone(&self.sink);
        Sender {
            sink: Arc::new(move |action| sink(f(action))),
            token: self.token.clone(),
        }
    }
}

/// Side work requested by a reducer.
pub enum Effect<A> {
    /// Nothing to do.
    None,
    /// Feed an action back immediately, as a fresh reduction after the
    /// current one.
    Send(A),
    /// Spawn an asynchronous operation, optionally keyed for cancellation.
    Run {
        id: Option<EffectId>,
        operation: Operation<A>,
    },
    /// Cancel every in-flight effect registered under the id.
    Cancel(EffectId),
    /// Several effects running independently of each other.
    Merge(Vec<Effect<A>>),
}

impl<A> Default for Effect<A> {
    fn default() -> Self {
        Effect::None
    }
}

impl<A: Send + 'static> Effect<A> {
    pub fn none() -> Self {
        Effect::None
    }

    pub fn send(action: A) -> Self {
        Effect::Send(action)
    }

    /// Run an operation that may send any number of actions.
    pub fn run<F, Fut>(operation: F) -> Self
    where
        F: FnOnce(Sender<A>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Effect::Run {
            id: None,
            operation: Box::new(move |sender| Box::pin(operation(sender))),
        }
    }

    /// Run a future and send the single action it resolves to.
    pub fn task<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = A> + Send + 'static,
    {
        Self::run(move |sender| async move {
            let action = future.await;
            sender.send(action);
        })
    }

    pub fn cancel(id: impl Into<EffectId>) -> Self {
        Effect::Cancel(id.into())
    }

    /// Combine effects; `None` entries are dropped.
    pub fn merge(effects: impl IntoIterator<Item = Effect<A>>) -> Self {
        let mut effects: Vec<Effect<A>> = effects.into_iter().filter(|e| !e.is_none()).collect();
        match effects.len() {
            0 => Effect::None,
            1 => effects.remove(0),
            _ => Effect::Merge(effects),
        }
    }

    /// Tag every `Run` in this effect with `id`.
    ///
    /// When the store starts it, in-flight effects with the same id are
    /// cancelled first.
    pub fn cancellable(self, id: impl Into<EffectId>) -> Self {
        let id = id.into();
        self.tag(&id)
    }

    fn tag(self, id: &EffectId) -> Self {
        match self {
            Effect::Run { operation, .. } => Effect::Run {
                id: Some(id.clone()),
                operation,
            },
            Effect::Merge(effects) => {
                Effect::Merge(effects.into_iter().map(|e| e.tag(id)).collect())
            }
            other => other,
        }
    }

    /// Re-wrap every action this effect yields.
    pub fn map<B: Send + 'static>(self, f: impl Fn(A) -> B + Send + Sync + 'static) -> Effect<B> {
        self.map_with(Arc::new(f))
    }

    fn map_with<B: Send + 'static>(self, f: Arc<dyn Fn(A) -> B + Send + Sync>) -> Effect<B> {
        match self {
            Effect::None => Effect::None,
            Effect::Send(action) => Effect::Send(f(action)),
            Effect::Run { id, operation } => Effect::Run {
                id,
                operation: Box::new(move |sender: Sender<B>| operation(sender.contramap(f))),
            },
            Effect::Cancel(id) => Effect::Cancel(id),
            Effect::Merge(effects) => Effect::Merge(
                effects
                    .into_iter()
                    .map(|e| e.map_with(Arc::clone(&f)))
                    .collect(),
            ),
        }
    }
}

impl<A> Effect<A> {
    /// True when running this effect could have no observable outcome.
    pub fn is_none(&self) -> bool {
        match self {
            Effect::None => true,
            Effect::Merge(effects) => effects.iter().all(Effect::is_none),
            _ => false,
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => f.write_str("None"),
            Effect::Send(action) => f.debug_tuple("Send").field(action).finish(),
            Effect::Run { id, .. } => f.debug_struct("Run").field("id", id).finish_non_exhaustive(),
            Effect::Cancel(id) => f.debug_tuple("Cancel").field(id).finish(),
            Effect::Merge(effects) => f.debug_list().entries(effects).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Child {
        Done(u32),
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Parent {
        Child(Child),
    }

    fn capture<A: Send + 'static>() -> (Sender<A>, Arc<Mutex<Vec<A>>>, CancellationToken) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let token = CancellationToken::new();
        let sender = Sender::new(move |a| sink.lock().push(a), token.clone());
        (sender, received, token)
    }

    #[test]
    fn merge_drops_none_and_unwraps_single() {
        let effect: Effect<Child> = Effect::merge([Effect::none(), Effect::send(Child::Done(1))]);
        assert!(matches!(effect, Effect::Send(Child::Done(1))));

        let empty: Effect<Child> = Effect::merge([Effect::none(), Effect::none()]);
        assert!(empty.is_none());
    }

    #[test]
    fn map_rewraps_send() {
        let effect = Effect::send(Child::Done(7)).map(Parent::Child);
        assert!(matches!(effect, Effect::Send(Parent::Child(Child::Done(7)))));
    }

    #[test]
    fn cancellable_tags_every_run() {
        let effect: Effect<Child> = Effect::merge([
            Effect::run(|_| async {}),
            Effect::run(|_| async {}),
            Effect::send(Child::Done(0)),
        ])
        .cancellable("search");

        assert_eq!(
            format!("{:?}", effect),
            r#"[Run { id: Some(EffectId("search")), .. }, Run { id: Some(EffectId("search")), .. }, Send(Done(0))]"#
        );
    }

    #[tokio::test]
    async fn mapped_run_delivers_wrapped_actions() {
        let effect = Effect::task(async { Child::Done(3) }).map(Parent::Child);
        let (sender, received, _token) = capture::<Parent>();

        match effect {
            Effect::Run { operation, .. } => operation(sender).await,
            other => panic!("Expected Run, got {:?}", other),
        }

        assert_eq!(*received.lock(), vec![Parent::Child(Child::Done(3))]);
    }

    #[tokio::test]
    async fn cancelled_sender_drops_actions() {
        let (sender, received, token) = capture::<Child>();
        sender.send(Child::Done(1));
        token.cancel();
        sender.send(Child::Done(2));

        assert!(sender.is_cancelled());
        sender.cancelled().await;
        assert_eq!(*received.lock(), vec![Child::Done(1)]);
    }
}
