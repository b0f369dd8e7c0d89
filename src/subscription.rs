//! Ongoing event sources.
//!
//! A [`Subscription`] wraps a [`SubscriptionSource`], an identifiable stream
//! of values that the runtime keeps alive for as long as the application
//! requests it. After every update the [`SubscriptionManager`] diffs the
//! requested set against the running set by [`SubscriptionId`]: new sources
//! are started, unchanged ones keep running, removed ones are cancelled.

pub mod mock;
pub mod terminal;

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Identity of a subscription, used to diff the requested set between updates.
///
/// Two subscriptions with the same id are considered the same ongoing source:
/// the already-running one is kept rather than restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    hash: u64,
}

impl SubscriptionId {
    /// Build an id from the source type and a hash of its parameters.
    ///
    /// Including the type prevents two different source types with colliding
    /// parameter hashes from being treated as the same subscription.
    #[must_use]
    pub fn of<T: 'static>(hash: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            hash,
        }
    }
}

/// An identifiable stream of values that can be subscribed to.
pub trait SubscriptionSource: Send + Sync + 'static {
    type Output: Send + 'static;

    /// Open a fresh stream of output values.
    fn stream(&self) -> BoxStream<'static, Self::Output>;

    /// A stable identity derived from the source's type and parameters.
    fn id(&self) -> SubscriptionId;
}

/// A subscription to an event source, with its output mapped into the
/// application's message type.
pub struct Subscription<Msg> {
    id: SubscriptionId,
    pub(crate) spawn: Box<dyn Fn() -> BoxStream<'static, Msg> + Send>,
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Subscribe to the given source.
    pub fn new<S>(source: S) -> Self
    where
        S: SubscriptionSource<Output = Msg>,
    {
        let id = source.id();
        let source = Arc::new(source);
        Self {
            id,
            spawn: Box::new(move || source.stream()),
        }
    }

    /// Convert the subscription's output with `f`.
    ///
    /// The identity is unchanged: mapping does not restart a running source.
    pub fn map<B, F>(self, f: F) -> Subscription<B>
    where
        B: Send + 'static,
        F: Fn(Msg) -> B + Send + Sync + Clone + 'static,
    {
        let spawn = self.spawn;
        Subscription {
            id: self.id,
            spawn: Box::new(move || {
                let f = f.clone();
                (spawn)().map(move |msg| f(msg)).boxed()
            }),
        }
    }

    /// The identity used for diffing.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

/// Handle for a running subscription task.
struct Handle {
    token: CancellationToken,
    _join: JoinHandle<()>,
}

/// Keeps the set of running subscription tasks in sync with the set the
/// application requests.
pub struct SubscriptionManager<Msg> {
    tx: mpsc::UnboundedSender<Msg>,
    active: HashMap<SubscriptionId, Handle>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            tx,
            active: HashMap::new(),
        }
    }

    /// Reconcile the running set with `subscriptions`.
    ///
    /// Sources whose id is already running are left untouched; new ids are
    /// started; ids no longer requested are cancelled, so no further output
    /// of theirs reaches the application.
    pub fn update(&mut self, subscriptions: Vec<Subscription<Msg>>) {
        let mut requested = HashSet::new();

        for subscription in subscriptions {
            let id = subscription.id;
            requested.insert(id);
            if !self.active.contains_key(&id) {
                let handle = start(subscription, self.tx.clone());
                self.active.insert(id, handle);
            }
        }

        self.active.retain(|id, handle| {
            let keep = requested.contains(id);
            if !keep {
                handle.token.cancel();
            }
            keep
        });
    }

    /// Cancel every running subscription.
    pub fn shutdown(&mut self) {
        for handle in self.active.values() {
            handle.token.cancel();
        }
        self.active.clear();
    }

    /// Number of currently running subscription tasks.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

fn start<Msg: Send + 'static>(
    subscription: Subscription<Msg>,
    tx: mpsc::UnboundedSender<Msg>,
) -> Handle {
    let token = CancellationToken::new();
    let cancelled = token.clone();

    let join = tokio::spawn(async move {
        let mut stream = (subscription.spawn)();
        loop {
            tokio::select! {
                () = cancelled.cancelled() => break,
                item = stream.next() => match item {
                    Some(msg) => {
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
    });

    Handle { token, _join: join }
}
