//! Terminal input subscription built on crossterm's `EventStream`.

use std::hash::{DefaultHasher, Hash, Hasher};

use crossterm::event::{Event, EventStream};
use futures::{StreamExt, stream::BoxStream};

use super::{SubscriptionId, SubscriptionSource};

/// Terminal event subscription.
///
/// Emits key, mouse and resize events from the terminal. There is only ever
/// one terminal, so every instance shares the same [`SubscriptionId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalEvents;

impl TerminalEvents {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SubscriptionSource for TerminalEvents {
    type Output = Event;

    fn stream(&self) -> BoxStream<'static, Self::Output> {
        let events = EventStream::new();

        futures::stream::unfold(events, |mut events| async move {
            match events.next().await {
                Some(Ok(event)) => Some((event, events)),
                // Stop the stream on read errors or terminal close.
                Some(Err(_)) | None => None,
            }
        })
        .boxed()
    }

    fn id(&self) -> SubscriptionId {
        let mut hasher = DefaultHasher::new();
        "terminal".hash(&mut hasher);
        SubscriptionId::of::<Self>(hasher.finish())
    }
}
