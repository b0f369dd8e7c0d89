use ratatui::Frame;

use crate::{command::Command, subscription::Subscription};

/// The main trait that defines a TUI application following the Elm Architecture.
///
/// All state lives in the implementing type, all state changes happen in
/// [`update`](Application::update) on the runtime's single logical thread,
/// and [`view`](Application::view) is a pure projection of that state.
///
/// # Example
///
/// ```
/// use ratatui::Frame;
/// use citadel::{application::Application, command::Command, subscription::Subscription};
///
/// #[derive(Debug, Clone)]
/// enum Message {
///     Increment,
/// }
///
/// struct Counter {
///     value: i32,
/// }
///
/// impl Application for Counter {
///     type Message = Message;
///     type Flags = i32;
///
///     fn new(initial: i32) -> (Self, Command<Message>) {
///         (Counter { value: initial }, Command::none())
///     }
///
///     fn update(&mut self, msg: Message) -> Command<Message> {
///         match msg {
///             Message::Increment => self.value += 1,
///         }
///         Command::none()
///     }
///
///     fn view(&self, frame: &mut Frame<'_>) {
///         // Render UI here
///     }
///
///     fn subscriptions(&self) -> Vec<Subscription<Message>> {
///         vec![]
///     }
/// }
/// ```
pub trait Application: Sized {
    /// The type of messages the application processes.
    ///
    /// Messages represent every event that can occur: user input,
    /// subscription output, and completions of asynchronous commands.
    type Message: Send + 'static;

    /// Configuration data passed at initialization. Use `()` if none is needed.
    type Flags: Send;

    /// Initialize the application, returning the initial state and a startup
    /// command (`Command::none()` if there is nothing to do).
    fn new(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Process a message and update the application state, optionally
    /// returning a command to run asynchronous work.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the user interface for the current state.
    ///
    /// Called once per frame. Should only read from `self`; all state
    /// changes belong in [`update`](Application::update).
    fn view(&self, frame: &mut Frame<'_>);

    /// The ongoing event sources the application wants to listen to, given
    /// its current state. The runtime diffs this set after every update.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>>;
}
