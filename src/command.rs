use futures::{
    FutureExt, Stream, StreamExt,
    stream::{self, BoxStream, select_all},
};

/// An action that can be performed by a command.
///
/// Actions are emitted by command streams and processed by the runtime.
pub enum Action<Msg> {
    /// Send a message to the application's update function.
    Message(Msg),

    /// Request the application to quit.
    ///
    /// When this action is emitted, the runtime terminates the event loop
    /// and shuts the application down.
    Quit,
}

/// A command that can be executed to perform side effects.
///
/// Commands represent asynchronous operations that produce messages or
/// actions: network requests, timers, anything that must not block the
/// update loop. They are returned from `Application::new` and
/// `Application::update` and executed by the runtime on spawned tasks.
///
/// # Examples
///
/// ```
/// use citadel::command::Command;
///
/// enum Message {
///     GotResult(i32),
/// }
///
/// let cmd = Command::perform(async { 42 }, Message::GotResult);
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) stream: Option<BoxStream<'static, Action<Msg>>>,
}

impl<Msg: Send + 'static> Command<Msg> {
    /// Create a command that does nothing.
    pub fn none() -> Self {
        Self { stream: None }
    }

    /// Send a message immediately, without any asynchronous work.
    pub fn message(msg: Msg) -> Self {
        Self::effect(Action::Message(msg))
    }

    /// Perform an asynchronous operation and convert its result to a message.
    ///
    /// # Examples
    ///
    /// ```
    /// use citadel::command::Command;
    ///
    /// async fn fetch_data() -> String {
    ///     "data".to_string()
    /// }
    ///
    /// enum Message {
    ///     DataReceived(String),
    /// }
    ///
    /// let cmd = Command::perform(fetch_data(), Message::DataReceived);
    /// ```
    pub fn perform<A>(
        future: impl Future<Output = A> + Send + 'static,
        f: impl FnOnce(A) -> Msg + Send + 'static,
    ) -> Self {
        Self::future(future.map(f))
    }

    /// Create a command from a future that directly produces a message.
    pub fn future(future: impl Future<Output = Msg> + Send + 'static) -> Self {
        Self {
            stream: Some(future.into_stream().map(Action::Message).boxed()),
        }
    }

    /// Create a command that performs a single action immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use citadel::command::{Action, Command};
    ///
    /// let cmd: Command<i32> = Command::effect(Action::Quit);
    /// ```
    pub fn effect(action: Action<Msg>) -> Self {
        Self {
            stream: Some(stream::once(async move { action }).boxed()),
        }
    }

    /// Batch multiple commands into a single command.
    ///
    /// All commands execute concurrently; message arrival order is not
    /// guaranteed. `Command::none()` entries are filtered out.
    pub fn batch(commands: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let streams: Vec<_> = commands.into_iter().filter_map(|cmd| cmd.stream).collect();

        if streams.is_empty() {
            Self::none()
        } else {
            Self {
                stream: Some(select_all(streams).boxed()),
            }
        }
    }

    /// Create a command from a stream of messages.
    ///
    /// Each item the stream yields is delivered to the application's update
    /// function, in stream order.
    ///
    /// # Examples
    ///
    /// ```
    /// use citadel::command::Command;
    /// use futures::stream;
    ///
    /// let messages = stream::iter(vec![1, 2, 3]);
    /// let cmd = Command::stream(messages);
    /// ```
    pub fn stream(stream: impl Stream<Item = Msg> + Send + 'static) -> Self {
        Self {
            stream: Some(stream.map(Action::Message).boxed()),
        }
    }

    /// Convert every message this command produces with `f`.
    ///
    /// `Action::Quit` passes through unchanged.
    pub fn map<B: Send + 'static>(self, f: impl Fn(Msg) -> B + Send + 'static) -> Command<B> {
        Command {
            stream: self.stream.map(|stream| {
                stream
                    .map(move |action| match action {
                        Action::Message(msg) => Action::Message(f(msg)),
                        Action::Quit => Action::Quit,
                    })
                    .boxed()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    async fn collect_messages<Msg: Send + 'static>(cmd: Command<Msg>) -> Vec<Msg> {
        let mut messages = vec![];
        if let Some(mut stream) = cmd.stream {
            while let Some(action) = stream.next().await {
                match action {
                    Action::Message(msg) => messages.push(msg),
                    Action::Quit => break,
                }
            }
        }
        messages
    }

    #[tokio::test]
    async fn batch_empty_is_none() {
        let cmd: Command<i32> = Command::batch(vec![]);
        assert!(cmd.stream.is_none());
    }

    #[tokio::test]
    async fn batch_runs_all_commands() {
        let cmd = Command::batch(vec![
            Command::future(async { 1 }),
            Command::future(async { 2 }),
            Command::future(async { 3 }),
        ]);

        let mut results = collect_messages(cmd).await;
        results.sort();
        assert_eq!(results, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn stream_delivers_items_in_order() {
        let cmd = Command::stream(stream::iter(vec![1, 2, 3]));
        assert_eq!(collect_messages(cmd).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn batch_filters_none() {
        let cmd = Command::batch(vec![
            Command::future(async { 1 }),
            Command::none(),
            Command::future(async { 3 }),
        ]);

        let mut results = collect_messages(cmd).await;
        results.sort();
        assert_eq!(results, vec![1, 3]);

        let cmd = Command::batch(vec![Command::<i32>::none(), Command::none()]);
        assert!(cmd.stream.is_none());
    }

    #[tokio::test]
    async fn message_is_immediate() {
        let cmd = Command::message(7);
        assert_eq!(collect_messages(cmd).await, vec![7]);
    }

    #[tokio::test]
    async fn map_converts_messages() {
        let cmd = Command::future(async { 21 }).map(|n| n * 2);
        assert_eq!(collect_messages(cmd).await, vec![42]);
    }

    #[tokio::test]
    async fn map_preserves_quit() {
        let cmd: Command<i32> = Command::effect(Action::Quit);
        let cmd = cmd.map(|n| n + 1);

        let mut stream = cmd.stream.expect("stream should exist");
        let action = stream.next().await.expect("should have action");
        assert!(matches!(action, Action::Quit));
    }
}
