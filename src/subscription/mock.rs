//! Controllable subscription source for testing.
//!
//! [`MockSource`] emits values on demand through a broadcast channel, which
//! makes subscription-driven behavior testable without real I/O or time
//! dependencies. Clone it into the application's `subscriptions()` and keep a
//! copy in the test to drive it.

use std::hash::{DefaultHasher, Hash, Hasher};

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::broadcast;

use super::{SubscriptionId, SubscriptionSource};

/// A subscription source that emits values when told to.
#[derive(Debug, Clone)]
pub struct MockSource<T: Clone> {
    sender: broadcast::Sender<T>,
    id: SubscriptionId,
}

impl<T: Clone + Send + 'static> MockSource<T> {
    /// Create a mock source with the given buffer capacity.
    ///
    /// Each instance gets a distinct [`SubscriptionId`] so two mocks of the
    /// same type never collide in the subscription manager.
    ///
    /// # Panics
    ///
    /// Panics if the system time is before [`std::time::UNIX_EPOCH`].
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut hasher = DefaultHasher::new();
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos()
            .hash(&mut hasher);
        std::any::type_name::<T>().hash(&mut hasher);

        let (sender, _rx) = broadcast::channel(capacity);
        Self {
            sender,
            id: SubscriptionId::of::<Self>(hasher.finish()),
        }
    }

    /// Create a mock source with default capacity (100).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Emit a value to all active streams.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no active receivers.
    pub fn emit(&self, value: T) -> Result<usize, broadcast::error::SendError<T>> {
        self.sender.send(value)
    }

    /// Number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone + Send + 'static> Default for MockSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> SubscriptionSource for MockSource<T> {
    type Output = T;

    fn stream(&self) -> BoxStream<'static, Self::Output> {
        let rx = self.sender.subscribe();
        tokio_stream::wrappers::BroadcastStream::new(rx)
            .filter_map(|result| async move { result.ok() })
            .boxed()
    }

    fn id(&self) -> SubscriptionId {
        self.id
    }
}
