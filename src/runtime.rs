use std::time::Duration;

use color_eyre::eyre::Result;
use futures::stream::StreamExt;
use ratatui::prelude::Backend;
use tokio::{sync::mpsc, time::sleep};
use tokio_util::sync::CancellationToken;

use crate::{
    application::Application,
    command::{Action, Command},
    subscription::SubscriptionManager,
};

/// Drives an [`Application`]: renders frames, delivers messages, executes
/// commands, and keeps subscriptions in sync.
///
/// All `update` and `view` calls happen on the task that owns the runtime;
/// command futures run on spawned tasks and deliver their results back
/// through the message channel, never concurrently with an update.
pub struct Runtime<A: Application> {
    app: A,
    tx: mpsc::UnboundedSender<A::Message>,
    rx: mpsc::UnboundedReceiver<A::Message>,
    subscriptions: SubscriptionManager<A::Message>,
    quit: CancellationToken,
    frame_duration: Duration,
}

impl<A: Application> Runtime<A> {
    /// Initialize the application and set up the event loop at `frame_rate`
    /// frames per second.
    pub fn new(flags: A::Flags, frame_rate: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscriptions = SubscriptionManager::new(tx.clone());
        let quit = CancellationToken::new();

        let (app, init) = A::new(flags);
        let mut runtime = Self {
            app,
            tx,
            rx,
            subscriptions,
            quit,
            frame_duration: frame_duration(frame_rate),
        };
        runtime.dispatch(init);
        runtime
    }

    /// Run the event loop until the application requests quit.
    pub async fn run<B: Backend>(mut self, terminal: &mut ratatui::Terminal<B>) -> Result<()> {
        self.subscriptions.update(self.app.subscriptions());

        loop {
            terminal.draw(|frame| self.app.view(frame))?;

            tokio::select! {
                () = self.quit.cancelled() => break,
                () = sleep(self.frame_duration) => {}
                maybe = self.rx.recv() => {
                    let Some(msg) = maybe else { break };
                    self.step(msg);
                    // Drain whatever else arrived before drawing again.
                    while let Ok(msg) = self.rx.try_recv() {
                        self.step(msg);
                    }
                }
            }

            if self.quit.is_cancelled() {
                break;
            }
        }

        self.subscriptions.shutdown();
        Ok(())
    }

    fn step(&mut self, msg: A::Message) {
        let cmd = self.app.update(msg);
        self.dispatch(cmd);
        self.subscriptions.update(self.app.subscriptions());
    }

    fn dispatch(&mut self, cmd: Command<A::Message>) {
        let Some(mut stream) = cmd.stream else {
            return;
        };

        let tx = self.tx.clone();
        let quit = self.quit.clone();
        tokio::spawn(async move {
            while let Some(action) = stream.next().await {
                match action {
                    Action::Message(msg) => {
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Action::Quit => {
                        quit.cancel();
                        break;
                    }
                }
            }
        });
    }
}

/// Frame interval for a target frame rate, never zero: an integer-millisecond
/// division would truncate to a busy spin for rates above 1000.
fn frame_duration(frame_rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(frame_rate.max(1)))
}
