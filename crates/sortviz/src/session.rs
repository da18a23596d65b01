//! The visualizer session.
//!
//! A `Session` owns the array, the run state and the configuration. It
//! admits at most one run at a time, runs it as a task on the current
//! runtime, and pushes a fresh [`Model`] to its [`EventHandler`] after every
//! change.

use crate::{
    EventHandler,
    algorithm::Algorithm,
    engine::{self, Observer, StepEvent},
    error::EngineError,
    model::{Config, MAX_VALUE, MIN_VALUE, Model, RunState},
    suspend::Control,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::{sync::mpsc, task::JoinHandle};

pub const MESSAGE_IN_PROGRESS: &str = "Sorting in progress...";
pub const MESSAGE_SORTED: &str = "Array sorted successfully!";
pub const MESSAGE_ALREADY_SORTED: &str = "Array is already sorted!";
pub const MESSAGE_PAUSED: &str = "Sorting paused";
pub const MESSAGE_RESUMED: &str = "Sorting resumed...";
pub const MESSAGE_CANCELLED: &str = "Sorting cancelled";

#[derive(Debug)]
pub enum SessionCommand {
    GenerateArray,
    LoadArray(Vec<i64>),
    SetSize(usize),
    SetSpeed(u64),
    Start(Algorithm),
    TogglePause,
    Cancel,

    Stop,
}

pub struct Session {
    event_handler: Arc<dyn EventHandler>,
    control: Control,
    inner: Mutex<Inner>,
}

struct Inner {
    array: Arc<[i64]>,
    state: RunState,
    config: Config,
    rng: StdRng,
}

impl Inner {
    fn regenerate(&mut self) {
        let size = self.config.size();
        let rng = &mut self.rng;
        self.array = (0..size).map(|_| rng.gen_range(MIN_VALUE..MAX_VALUE)).collect();
        self.state.reset();
        self.state.message.clear();
    }
}

impl Session {
    /// Creates a session with a freshly generated array.
    ///
    /// A `seed` makes the generated arrays reproducible.
    pub fn new(event_handler: Arc<dyn EventHandler>, config: Config, seed: Option<u64>) -> Arc<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut inner = Inner {
            array: Arc::from(Vec::new()),
            state: RunState::default(),
            config,
            rng,
        };
        inner.regenerate();

        Arc::new(Self {
            event_handler,
            control: Control::new(config.delay_ms()),
            inner: Mutex::new(inner),
        })
    }

    /// Handles commands until `Stop` is received or every sender is dropped.
    pub async fn run(
        self: &Arc<Self>,
        mut rx: mpsc::UnboundedReceiver<SessionCommand>,
    ) -> anyhow::Result<()> {
        self.notify();

        loop {
            tokio::select! {
                Some(command) = rx.recv() => {
                    log::trace!("session: handling {command:?}");
                    match command {
                        SessionCommand::GenerateArray => self.generate_array(),
                        SessionCommand::LoadArray(values) => self.load_array(values),
                        SessionCommand::SetSize(size) => self.set_size(size),
                        SessionCommand::SetSpeed(delay_ms) => self.set_speed(delay_ms),
                        SessionCommand::Start(algorithm) => {
                            self.start(algorithm);
                        }
                        SessionCommand::TogglePause => self.toggle_pause(),
                        SessionCommand::Cancel => self.cancel(),

                        SessionCommand::Stop => break,
                    }
                }

                else => {
                    log::warn!("all senders dropped in Session::run, shutting down");
                    break;
                }
            }
        }

        self.cancel();

        Ok(())
    }

    pub fn model(&self) -> Model {
        let inner = self.inner();
        Model {
            array: inner.array.clone(),
            state: inner.state.clone(),
            config: inner.config,
        }
    }

    /// Replaces the array with random values. Ignored while running.
    pub fn generate_array(&self) {
        {
            let mut inner = self.inner();
            if inner.state.running {
                log::warn!("session: ignoring new array while running");
                return;
            }
            inner.regenerate();
            log::debug!("session: generated {} values", inner.array.len());
        }
        self.notify();
    }

    /// Replaces the array with `values`, of any length. Ignored while
    /// running.
    pub fn load_array(&self, values: Vec<i64>) {
        {
            let mut inner = self.inner();
            if inner.state.running {
                log::warn!("session: ignoring loaded array while running");
                return;
            }
            log::debug!("session: loaded {} values", values.len());
            inner.array = values.into();
            inner.state.reset();
            inner.state.message.clear();
        }
        self.notify();
    }

    /// Sets the array size, clamped, and regenerates. Ignored while running.
    pub fn set_size(&self, size: usize) {
        {
            let mut inner = self.inner();
            if inner.state.running {
                log::warn!("session: ignoring size change while running");
                return;
            }
            inner.config.set_size(size);
            inner.regenerate();
        }
        self.notify();
    }

    /// Sets the step delay, clamped. Applies from the next suspension of an
    /// active run.
    pub fn set_speed(&self, delay_ms: u64) {
        {
            let mut inner = self.inner();
            inner.config.set_delay_ms(delay_ms);
            self.control.set_delay_ms(inner.config.delay_ms());
        }
        self.notify();
    }

    /// Starts `algorithm` on the current array.
    ///
    /// Returns `None` without doing anything if a run is active, and without
    /// touching the counters if the array is already sorted.
    pub fn start(self: &Arc<Self>, algorithm: Algorithm) -> Option<JoinHandle<()>> {
        let input = {
            let mut inner = self.inner();
            if inner.state.running {
                log::warn!("session: ignoring {algorithm}, a run is already active");
                return None;
            }

            if engine::is_sorted(&inner.array) {
                inner.state.message = MESSAGE_ALREADY_SORTED.to_string();
                None
            } else {
                inner.state.reset();
                inner.state.algorithm = Some(algorithm);
                inner.state.running = true;
                inner.state.paused = false;
                inner.state.message = MESSAGE_IN_PROGRESS.to_string();
                Some((inner.array.clone(), inner.array.to_vec()))
            }
        };
        let Some((original, input)) = input else {
            log::info!("session: array is already sorted, not starting {algorithm}");
            self.notify();
            return None;
        };

        self.control.reset();
        self.notify();

        let session = self.clone();
        Some(tokio::spawn(async move {
            let result = engine::run(algorithm, input, &session.control, &*session).await;
            session.finish(result, original);
        }))
    }

    /// Flips pause of the active run. Ignored when idle.
    pub fn toggle_pause(&self) {
        {
            let mut inner = self.inner();
            if !inner.state.running {
                log::debug!("session: nothing to pause");
                return;
            }
            let paused = self.control.toggle_pause();
            inner.state.paused = paused;
            inner.state.message = if paused {
                MESSAGE_PAUSED
            } else {
                MESSAGE_RESUMED
            }
            .to_string();
        }
        self.notify();
    }

    /// Asks the active run to stop at its next suspension point.
    pub fn cancel(&self) {
        if self.inner().state.running {
            log::debug!("session: cancelling run");
            self.control.cancel();
        }
    }

    /// A cancelled run may have stopped halfway through moving an element,
    /// so the array it started from is restored.
    fn finish(&self, result: Result<Vec<i64>, EngineError>, original: Arc<[i64]>) {
        match result {
            Ok(_) => {}
            Err(EngineError::Cancelled) => {
                {
                    let mut inner = self.inner();
                    inner.array = original;
                    inner.state.reset();
                    inner.state.running = false;
                    inner.state.paused = false;
                    inner.state.algorithm = None;
                    inner.state.sorted = false;
                    inner.state.message = MESSAGE_CANCELLED.to_string();
                }
                self.notify();
            }
        }
        self.control.reset();
    }

    fn notify(&self) {
        let model = self.model();
        self.event_handler.on_update(model);
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Observer<i64> for Session {
    fn on_event(&self, event: StepEvent<i64>) {
        {
            let mut inner = self.inner();
            match event {
                StepEvent::Started { algorithm } => {
                    inner.state.algorithm = Some(algorithm);
                    inner.state.running = true;
                }
                StepEvent::Compared { counters } => {
                    inner.state.counters = counters;
                }
                StepEvent::Snapshot { array, counters } => {
                    inner.array = array;
                    inner.state.counters = counters;
                }
                StepEvent::Finished {
                    algorithm,
                    array,
                    counters,
                } => {
                    log::info!(
                        "session: {algorithm} sorted {} values with {} comparisons and {} writes",
                        array.len(),
                        counters.comparisons,
                        counters.writes
                    );
                    inner.array = array;
                    inner.state.counters = counters;
                    inner.state.running = false;
                    inner.state.paused = false;
                    inner.state.algorithm = None;
                    inner.state.sorted = true;
                    inner.state.message = MESSAGE_SORTED.to_string();
                }
            }
        }
        self.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Counters, MAX_DELAY_MS, MAX_SIZE, MIN_SIZE};
    use std::time::Duration;

    #[derive(Default)]
    struct Models(Mutex<Vec<Model>>);

    impl EventHandler for Models {
        fn on_update(&self, model: Model) {
            self.0.lock().unwrap().push(model);
        }
    }

    impl Models {
        fn all(&self) -> Vec<Model> {
            self.0.lock().unwrap().clone()
        }
    }

    fn session_with(values: Vec<i64>) -> (Arc<Session>, Arc<Models>) {
        let models = Arc::new(Models::default());
        let session = Session::new(models.clone(), Config::new(10, 10), Some(7));
        session.load_array(values);
        (session, models)
    }

    #[test]
    fn starts_idle_with_a_generated_array() {
        let session = Session::new(Arc::new(Models::default()), Config::default(), Some(1));
        let model = session.model();

        assert_eq!(model.array.len(), model.config.size());
        assert!(model
            .array
            .iter()
            .all(|v| (MIN_VALUE..MAX_VALUE).contains(v)));
        assert_eq!(model.state, RunState::default());
    }

    #[test]
    fn seeded_sessions_generate_the_same_arrays() {
        let a = Session::new(Arc::new(Models::default()), Config::default(), Some(99));
        let b = Session::new(Arc::new(Models::default()), Config::default(), Some(99));
        assert_eq!(a.model().array, b.model().array);

        a.generate_array();
        b.generate_array();
        assert_eq!(a.model().array, b.model().array);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_run_reports_sorted() {
        let (session, models) = session_with(vec![5, 3, 4, 1, 2]);

        session.start(Algorithm::Bubble).unwrap().await.unwrap();

        let model = session.model();
        assert_eq!(*model.array, [1, 2, 3, 4, 5]);
        assert_eq!(
            model.state,
            RunState {
                algorithm: None,
                running: false,
                paused: false,
                sorted: true,
                counters: Counters {
                    comparisons: 10,
                    writes: 8
                },
                message: MESSAGE_SORTED.to_string(),
            }
        );

        let during = models
            .all()
            .into_iter()
            .filter(|m| m.state.running)
            .collect::<Vec<_>>();
        assert!(!during.is_empty());
        assert!(
            during
                .iter()
                .all(|m| m.state.algorithm == Some(Algorithm::Bubble) && !m.state.sorted)
        );
        assert!(
            during
                .windows(2)
                .all(|w| w[0].state.counters.comparisons <= w[1].state.counters.comparisons
                    && w[0].state.counters.writes <= w[1].state.counters.writes)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn sorted_array_short_circuits() {
        let (session, _) = session_with(vec![4, 2, 3, 1, 0]);
        session.start(Algorithm::Insertion).unwrap().await.unwrap();
        let counters = session.model().state.counters;

        assert!(session.start(Algorithm::Merge).is_none());

        let state = session.model().state;
        assert!(!state.running);
        assert_eq!(state.algorithm, None);
        assert_eq!(state.counters, counters);
        assert_eq!(state.message, MESSAGE_ALREADY_SORTED);
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_is_ignored_while_running() {
        let (session, _) = session_with(vec![9, 8, 7, 6, 5, 4, 3, 2, 1]);

        let handle = session.start(Algorithm::Selection).unwrap();
        assert!(session.start(Algorithm::Quick).is_none());
        assert_eq!(session.model().state.algorithm, Some(Algorithm::Selection));

        handle.await.unwrap();
        assert_eq!(*session.model().array, [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_holds_the_array_until_resumed() {
        let (session, _) = session_with(vec![9, 8, 7, 6, 5, 4, 3, 2, 1]);
        let handle = session.start(Algorithm::Bubble).unwrap();

        tokio::time::sleep(Duration::from_millis(25)).await;
        session.toggle_pause();
        let state = session.model().state;
        assert!(state.paused);
        assert_eq!(state.message, MESSAGE_PAUSED);

        // the step already waiting may still land
        tokio::time::sleep(Duration::from_millis(50)).await;
        let held = session.model();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(session.model().array, held.array);
        assert_eq!(session.model().state.counters, held.state.counters);

        session.toggle_pause();
        assert_eq!(session.model().state.message, MESSAGE_RESUMED);

        handle.await.unwrap();
        let state = session.model().state;
        assert!(state.sorted);
        assert!(!state.paused);
        assert_eq!(state.counters.comparisons, 36);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_pause_when_idle_does_nothing() {
        let (session, _) = session_with(vec![2, 1]);
        session.toggle_pause();
        assert!(!session.model().state.paused);
        assert!(session.model().state.message.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_restores_the_array() {
        let input = (0..20).rev().collect::<Vec<i64>>();
        let (session, models) = session_with(input.clone());
        let handle = session.start(Algorithm::Merge).unwrap();

        tokio::time::sleep(Duration::from_millis(55)).await;
        session.cancel();
        handle.await.unwrap();

        assert!(models.all().iter().any(|m| m.state.counters.writes > 0));

        let model = session.model();
        assert_eq!(*model.array, *input);
        assert!(!model.state.running);
        assert!(!model.state.sorted);
        assert_eq!(model.state.algorithm, None);
        assert_eq!(model.state.counters, Counters::default());
        assert_eq!(model.state.message, MESSAGE_CANCELLED);

        // a new run can be admitted afterwards
        session.start(Algorithm::Quick).unwrap().await.unwrap();
        assert!(session.model().state.sorted);
    }

    #[tokio::test(start_paused = true)]
    async fn size_changes_are_clamped_and_blocked_while_running() {
        let (session, _) = session_with(vec![3, 2, 1]);

        session.set_size(1000);
        assert_eq!(session.model().array.len(), MAX_SIZE);
        session.set_size(0);
        assert_eq!(session.model().array.len(), MIN_SIZE);
        assert_eq!(session.model().config.size(), MIN_SIZE);

        session.load_array(vec![3, 2, 1]);
        let handle = session.start(Algorithm::Bubble).unwrap();
        session.set_size(50);
        session.generate_array();
        session.load_array(vec![1]);
        assert_eq!(session.model().config.size(), MIN_SIZE);

        handle.await.unwrap();
        assert_eq!(*session.model().array, [1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_changes_apply_during_a_run() {
        let (session, _) = session_with(vec![4, 3, 2, 1]);
        let handle = session.start(Algorithm::Insertion).unwrap();

        session.set_speed(5000);
        assert_eq!(session.model().config.delay_ms(), MAX_DELAY_MS);
        assert_eq!(session.control.delay(), Duration::from_millis(MAX_DELAY_MS));

        handle.await.unwrap();
        assert_eq!(*session.model().array, [1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn new_array_resets_counters() {
        let (session, _) = session_with(vec![2, 1]);
        session.start(Algorithm::Bubble).unwrap().await.unwrap();
        assert!(session.model().state.sorted);

        session.generate_array();
        let state = session.model().state;
        assert!(!state.sorted);
        assert_eq!(state.counters, Counters::default());
        assert!(state.message.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn commands_drive_the_session() {
        let (session, _) = session_with(vec![3, 1, 2]);
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn({
            let session = session.clone();
            async move { session.run(rx).await }
        });

        tx.send(SessionCommand::SetSpeed(20)).unwrap();
        tx.send(SessionCommand::Start(Algorithm::Quick)).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(session.model().state.sorted);
        assert_eq!(session.model().config.delay_ms(), 20);

        tx.send(SessionCommand::Stop).unwrap();
        task.await.unwrap().unwrap();
    }
}
