//! Remote-query state machine.
//!
//! Every screen that fetches data owns a [`QueryHandle`]: the published
//! [`QueryState`] plus a monotonically increasing attempt counter. Starting
//! an attempt publishes `Loading` and returns a [`Command`] whose completion
//! carries the attempt id; resolving a completion whose id is no longer
//! current is a no-op, so a slow superseded response can never overwrite a
//! fresher state (last write wins by start order, not completion order).
//!
//! The same handle serves both invocation modes:
//!
//! - **eager**: the caller starts an attempt when the screen becomes active
//!   and again whenever its variables change;
//! - **lazy**: the caller starts an attempt only on an explicit trigger,
//!   leaving the handle `Idle` until then.
//!
//! # Example
//!
//! ```rust,ignore
//! fn update(&mut self, msg: Message) -> Command<Message> {
//!     match msg {
//!         Message::Open(id) => self
//!             .detail
//!             .start(self.api.character(&id))
//!             .map(Message::DetailFetched),
//!         Message::DetailFetched(completion) => {
//!             self.detail.resolve(completion);
//!             Command::none()
//!         }
//!     }
//! }
//! ```

use tracing::{debug, warn};

use crate::command::Command;
use crate::transport::{ErrorKind, QueryError};

/// The published state of a remote query.
///
/// The representation enforces the phase invariant: data exists only in
/// `Success`, error information only in `Error`, and neither in `Idle` or
/// `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
    /// No attempt has been started (lazy queries before their trigger).
    Idle,
    /// An attempt is in flight.
    Loading,
    /// The latest attempt failed; only the classified kind is published,
    /// the detail goes to the diagnostic log.
    Error(ErrorKind),
    /// The latest attempt succeeded. A payload indicating "not found" is
    /// still `Success`; that is a data condition for the consumer, not a
    /// transport condition.
    Success(T),
}

impl<T> QueryState<T> {
    /// The payload, if the query succeeded.
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The classified error, if the query failed.
    pub const fn error(&self) -> Option<ErrorKind> {
        match self {
            Self::Error(kind) => Some(*kind),
            _ => None,
        }
    }

    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Outcome of one attempt, tagged with the attempt that produced it.
#[derive(Debug)]
pub struct Completion<T> {
    attempt: u64,
    outcome: Result<T, QueryError>,
}

impl<T> Completion<T> {
    /// Build a completion for a specific attempt. Exposed so tests can
    /// simulate out-of-order network responses.
    #[must_use]
    pub fn new(attempt: u64, outcome: Result<T, QueryError>) -> Self {
        Self { attempt, outcome }
    }
}

/// One logical query instance: the live state plus attempt sequencing.
#[derive(Debug)]
pub struct QueryHandle<T> {
    state: QueryState<T>,
    attempt: u64,
}

impl<T: Send + 'static> Default for QueryHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> QueryHandle<T> {
    /// A handle with no attempt started.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: QueryState::Idle,
            attempt: 0,
        }
    }

    /// The live state for rendering.
    pub const fn state(&self) -> &QueryState<T> {
        &self.state
    }

    /// The id of the most recently started attempt.
    #[must_use]
    pub const fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Start a new attempt.
    ///
    /// Publishes `Loading` (clearing any previous data or error) and returns
    /// a command that resolves `future` and tags the outcome with this
    /// attempt's id. Any attempt still in flight is logically cancelled: its
    /// completion will no longer match the current id.
    pub fn start<Fut>(&mut self, future: Fut) -> Command<Completion<T>>
    where
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        self.attempt += 1;
        self.state = QueryState::Loading;

        let attempt = self.attempt;
        Command::perform(future, move |outcome| Completion { attempt, outcome })
    }

    /// Apply a completion to the published state.
    ///
    /// Returns `false` and leaves the state untouched if the completion is
    /// stale, i.e. a newer attempt has started since it was issued. Transport
    /// detail from failed attempts is logged here and never published.
    pub fn resolve(&mut self, completion: Completion<T>) -> bool {
        if completion.attempt != self.attempt {
            debug!(
                stale = completion.attempt,
                current = self.attempt,
                "discarding stale query completion"
            );
            return false;
        }

        self.state = match completion.outcome {
            Ok(data) => QueryState::Success(data),
            Err(error) => {
                warn!(%error, "query attempt failed");
                QueryState::Error(error.kind())
            }
        };
        true
    }

    /// Return to `Idle` and invalidate all in-flight attempts.
    ///
    /// Used when the owning screen is torn down: completions for prior
    /// attempts become stale, so nothing is ever delivered to a screen the
    /// user has left.
    pub fn reset(&mut self) {
        self.attempt += 1;
        self.state = QueryState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Action;
    use futures::StreamExt;

    async fn resolve_command<T: Send + 'static>(cmd: Command<Completion<T>>) -> Completion<T> {
        let mut stream = cmd.stream.expect("start should produce a command");
        match stream.next().await {
            Some(Action::Message(completion)) => completion,
            _ => panic!("expected a completion message"),
        }
    }

    #[test]
    fn new_handle_is_idle() {
        let handle = QueryHandle::<i32>::new();
        assert!(handle.state().is_idle());
        assert_eq!(handle.attempt(), 0);
        assert_eq!(handle.state().data(), None);
        assert_eq!(handle.state().error(), None);
    }

    #[tokio::test]
    async fn success_populates_data_only() {
        let mut handle = QueryHandle::new();
        let cmd = handle.start(async { Ok(42) });
        assert!(handle.state().is_loading());
        assert_eq!(handle.state().data(), None);
        assert_eq!(handle.state().error(), None);

        let completion = resolve_command(cmd).await;
        assert!(handle.resolve(completion));
        assert_eq!(handle.state().data(), Some(&42));
        assert_eq!(handle.state().error(), None);
    }

    #[tokio::test]
    async fn failure_populates_error_only() {
        let mut handle = QueryHandle::<i32>::new();
        let cmd = handle.start(async { Err(QueryError::Transport("timed out".into())) });

        let completion = resolve_command(cmd).await;
        assert!(handle.resolve(completion));
        assert_eq!(handle.state().error(), Some(ErrorKind::Transport));
        assert_eq!(handle.state().data(), None);
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let mut handle = QueryHandle::new();

        // Attempt 1 starts, then attempt 2 supersedes it.
        let first = handle.start(async { Ok(1) });
        let second = handle.start(async { Ok(2) });

        let second_completion = resolve_command(second).await;
        let first_completion = resolve_command(first).await;

        // Attempt 2 resolves first; attempt 1's late arrival must not win.
        assert!(handle.resolve(second_completion));
        assert_eq!(handle.state().data(), Some(&2));

        assert!(!handle.resolve(first_completion));
        assert_eq!(handle.state().data(), Some(&2));
    }

    #[tokio::test]
    async fn stale_completion_does_not_overwrite_loading() {
        let mut handle = QueryHandle::new();

        let first = handle.start(async { Ok(1) });
        let first_completion = resolve_command(first).await;

        // A newer attempt is still in flight.
        let _second = handle.start(async { Ok(2) });

        assert!(!handle.resolve(first_completion));
        assert!(handle.state().is_loading());
    }

    #[tokio::test]
    async fn repeated_trigger_is_idempotent() {
        let mut handle = QueryHandle::new();

        for _ in 0..2 {
            let cmd = handle.start(async { Ok("same") });
            let completion = resolve_command(cmd).await;
            assert!(handle.resolve(completion));
            assert_eq!(handle.state().data(), Some(&"same"));
        }
    }

    #[tokio::test]
    async fn error_stays_until_next_attempt() {
        let mut handle = QueryHandle::<i32>::new();

        let cmd = handle.start(async { Err(QueryError::Transport("down".into())) });
        let completion = resolve_command(cmd).await;
        handle.resolve(completion);
        assert_eq!(handle.state().error(), Some(ErrorKind::Transport));

        // No automatic retry; a new start transitions back to Loading.
        let _cmd = handle.start(async { Ok(1) });
        assert!(handle.state().is_loading());
        assert_eq!(handle.state().error(), None);
    }

    #[tokio::test]
    async fn slow_superseded_attempt_loses_under_real_timing() {
        use tokio::time::{Duration, sleep};

        let mut handle = QueryHandle::new();

        let slow = handle.start(async {
            sleep(Duration::from_millis(50)).await;
            Ok("stale answer")
        });
        let fast = handle.start(async { Ok("fresh answer") });

        // Run both concurrently; the slow one finishes last.
        let (slow_completion, fast_completion) =
            tokio::join!(resolve_command(slow), resolve_command(fast));

        assert!(handle.resolve(fast_completion));
        assert!(!handle.resolve(slow_completion));
        assert_eq!(handle.state().data(), Some(&"fresh answer"));
    }

    #[tokio::test]
    async fn rapid_restarts_publish_only_the_latest() {
        use tokio::time::{Duration, sleep};

        let mut handle = QueryHandle::new();
        let mut pending = Vec::new();

        for i in 0..5u64 {
            let delay = Duration::from_millis(40 - i * 8);
            let cmd = handle.start(async move {
                sleep(delay).await;
                Ok(i)
            });
            pending.push(resolve_command(cmd));
        }

        // Completion order is reversed relative to start order.
        let mut completions = futures::future::join_all(pending).await;
        completions.reverse();

        let mut applied = 0;
        for completion in completions {
            if handle.resolve(completion) {
                applied += 1;
            }
        }

        assert_eq!(applied, 1, "only the latest attempt may publish");
        assert_eq!(handle.state().data(), Some(&4));
    }

    #[tokio::test]
    async fn reset_invalidates_in_flight_attempts() {
        let mut handle = QueryHandle::new();

        let cmd = handle.start(async { Ok(1) });
        let completion = resolve_command(cmd).await;

        handle.reset();
        assert!(handle.state().is_idle());
        assert!(!handle.resolve(completion));
        assert!(handle.state().is_idle());
    }
}
