//! Event plumbing for the TUI.
//!
//! Terminal input, ticks and app events all arrive on one unbounded channel
//! so the main loop has a single place to wait.

use crate::app::AppEvent;
use futures::{FutureExt, StreamExt};
use ratatui::crossterm::event::Event as CrosstermEvent;
use std::time::Duration;
use tokio::sync::{OnceCell, mpsc};

/// Ticks per second. Ticks only refresh the elapsed run time.
const TICK_FPS: f64 = 4.0;

/// Sender used by [`app_send`], set once by [`EventHandler::new`].
pub(crate) static GLOBAL_SENDER: OnceCell<mpsc::UnboundedSender<Event>> = OnceCell::const_new();

/// Sends an AppEvent through the global sender from anywhere, including the
/// core's session thread and the logger.
///
/// Must be called after the App is created.
macro_rules! app_send {
    ($e:expr) => {{
        let _ = crate::event::GLOBAL_SENDER
            .get()
            .expect("app_send called before app was initialized")
            .send(crate::event::Event::App($e));
    }};
}
pub(crate) use app_send;

#[derive(Debug)]
pub enum Event {
    Tick,
    Crossterm(CrosstermEvent),
    App(AppEvent),
}

#[derive(Debug)]
pub struct EventHandler {
    sender: mpsc::UnboundedSender<Event>,
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Registers the global sender and spawns the input task.
    ///
    /// Panics if called twice.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        GLOBAL_SENDER
            .set(sender.clone())
            .expect("global sender already initialized");

        tokio::spawn(input_task(sender.clone()));

        Self { sender, receiver }
    }

    /// Waits for the next event.
    pub async fn next(&mut self) -> anyhow::Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or(anyhow::anyhow!("failed to receive event"))
    }

    /// Returns an already queued event, if any.
    ///
    /// Used to drain bursts of model updates before the next redraw.
    pub fn try_next(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }

    /// Queues an app event for the next loop iteration.
    pub fn send(&mut self, app_event: AppEvent) {
        // the receiver lives in self, so this cannot fail
        let _ = self.sender.send(Event::App(app_event));
    }
}

/// Forwards crossterm events and emits ticks until the receiver is dropped.
async fn input_task(sender: mpsc::UnboundedSender<Event>) {
    let mut reader = crossterm::event::EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_secs_f64(1.0 / TICK_FPS));

    loop {
        let crossterm_event = reader.next().fuse();
        let event = tokio::select! {
            _ = sender.closed() => break,
            _ = tick.tick() => Event::Tick,
            Some(Ok(event)) = crossterm_event => Event::Crossterm(event),
        };

        // fails only while shutting down
        if sender.send(event).is_err() {
            break;
        }
    }
}
