pub mod algorithm;
pub mod engine;
pub mod error;
pub mod model;
pub mod session;
pub mod suspend;

pub use crate::{
    algorithm::{Algorithm, AlgorithmInfo},
    model::{BarTone, Config, Counters, Model, RunState},
};

use crate::{
    error::{CoreError, core_error},
    session::{Session, SessionCommand},
};
use anyhow::Context;
use log::{debug, error};
use std::{
    sync::{Arc, Mutex},
    thread::JoinHandle,
};
use tokio::sync::mpsc;

/// Receives every new `Model` published by the session.
pub trait EventHandler: Send + Sync {
    fn on_update(&self, model: Model);
}

#[derive(Debug, Clone, Default)]
pub struct CoreOptions {
    /// Whether to install `env_logger` and the panic logger.
    pub init_logging: bool,
    pub config: Config,
    /// Seed for generated arrays.
    pub seed: Option<u64>,
    /// Initial array to use instead of a generated one.
    pub values: Option<Vec<i64>>,
}

/// Long-lived handle to a session running on its own thread.
#[derive(Debug)]
pub struct Core {
    session_tx: mpsc::UnboundedSender<SessionCommand>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Core {
    pub fn new(
        event_handler: Arc<dyn EventHandler>,
        options: CoreOptions,
    ) -> Result<Arc<Self>, CoreError> {
        if options.init_logging {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("debug"),
            )
            .try_init();
            log_panics::init();
        }

        debug!("core: starting core");

        let (session_tx, session_rx) = mpsc::unbounded_channel();

        // the session and its runs share one cooperative thread
        let thread = std::thread::Builder::new()
            .name("sortviz-session".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        error!("core: failed to build runtime: {e:#}");
                        return;
                    }
                };

                runtime.block_on(async move {
                    debug!("core: inside async runtime");

                    let session = Session::new(event_handler, options.config, options.seed);
                    if let Some(values) = options.values {
                        session.load_array(values);
                    }

                    if let Err(e) = session.run(session_rx).await {
                        error!("core: error running session: {e:#}");
                    }

                    debug!("core: inside async runtime - exiting");
                });
            })
            .context("failed to spawn session thread")?;

        Ok(Arc::new(Self {
            session_tx,
            thread: Mutex::new(Some(thread)),
        }))
    }

    pub fn generate_array(&self) -> Result<(), CoreError> {
        self.send(SessionCommand::GenerateArray)
    }

    pub fn load_array(&self, values: Vec<i64>) -> Result<(), CoreError> {
        self.send(SessionCommand::LoadArray(values))
    }

    pub fn set_size(&self, size: usize) -> Result<(), CoreError> {
        self.send(SessionCommand::SetSize(size))
    }

    pub fn set_speed(&self, delay_ms: u64) -> Result<(), CoreError> {
        self.send(SessionCommand::SetSpeed(delay_ms))
    }

    /// Starts a run. Ignored by the session while another run is active.
    pub fn start(&self, algorithm: Algorithm) -> Result<(), CoreError> {
        self.send(SessionCommand::Start(algorithm))
    }

    pub fn toggle_pause(&self) -> Result<(), CoreError> {
        self.send(SessionCommand::TogglePause)
    }

    pub fn cancel(&self) -> Result<(), CoreError> {
        self.send(SessionCommand::Cancel)
    }

    /// Stops the session and waits for its thread to exit.
    pub fn shutdown(&self) -> Result<(), CoreError> {
        // the session may already be gone
        let _ = self.session_tx.send(SessionCommand::Stop);

        let thread = self
            .thread
            .lock()
            .map_err(|_| core_error!("core thread handle poisoned"))?
            .take();
        if let Some(thread) = thread {
            thread
                .join()
                .map_err(|_| core_error!("session thread panicked"))?;
        }

        Ok(())
    }

    fn send(&self, command: SessionCommand) -> Result<(), CoreError> {
        self.session_tx
            .send(command)
            .context("failed to send to session thread")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::mpsc as std_mpsc, time::Duration};

    struct ChannelHandler(Mutex<std_mpsc::Sender<Model>>);

    impl EventHandler for ChannelHandler {
        fn on_update(&self, model: Model) {
            let _ = self.0.lock().unwrap().send(model);
        }
    }

    #[test]
    fn core_runs_a_sort_on_its_own_thread() {
        let (tx, rx) = std_mpsc::channel();
        let core = Core::new(
            Arc::new(ChannelHandler(Mutex::new(tx))),
            CoreOptions {
                config: Config::new(5, 10),
                values: Some(vec![3, 1, 2]),
                ..Default::default()
            },
        )
        .unwrap();

        core.start(Algorithm::Quick).unwrap();

        let sorted = loop {
            let model = rx
                .recv_timeout(Duration::from_secs(5))
                .expect("session stopped publishing");
            if model.state.sorted {
                break model;
            }
        };
        assert_eq!(*sorted.array, [1, 2, 3]);
        assert_eq!(sorted.state.counters.writes, 2);

        core.shutdown().unwrap();
        assert!(core.generate_array().is_err());
    }
}
