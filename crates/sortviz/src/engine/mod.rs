//! Stepwise sort execution.
//!
//! A run sorts a private working buffer one primitive at a time. Every
//! comparison is reported immediately, and every write into the buffer is
//! followed by a snapshot and a suspension point (see [`Control::suspend`]),
//! so an observer can replay the algorithm at the configured speed and a
//! caller can pause or cancel it between steps.
//!
//! [`run`] is the only entry point. It announces the start and the end of a
//! run; the recursive drivers underneath only touch the shared buffer and
//! counters.

mod merge;
mod quadratic;
mod quick;

use crate::{algorithm::Algorithm, error::EngineError, model::Counters, suspend::Control};
use std::sync::Arc;

/// Receives progress from a running sort.
pub trait Observer<T>: Send + Sync {
    fn on_event(&self, event: StepEvent<T>);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent<T> {
    Started {
        algorithm: Algorithm,
    },
    /// A comparison was counted. Sent before any suspension.
    Compared {
        counters: Counters,
    },
    /// The working buffer changed. Sent right before the run suspends.
    Snapshot {
        array: Arc<[T]>,
        counters: Counters,
    },
    Finished {
        algorithm: Algorithm,
        array: Arc<[T]>,
        counters: Counters,
    },
}

/// Returns true if `values` is in non-decreasing order.
pub fn is_sorted<T: Ord>(values: &[T]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

/// Runs `algorithm` over `input` and returns the sorted values.
///
/// Does not check whether `input` is already sorted. Returns
/// [`EngineError::Cancelled`] if `control` is cancelled before the run
/// completes, in which case no `Finished` event is sent.
pub async fn run<T>(
    algorithm: Algorithm,
    input: Vec<T>,
    control: &Control,
    observer: &dyn Observer<T>,
) -> Result<Vec<T>, EngineError>
where
    T: Ord + Clone + Send + Sync,
{
    log::debug!("engine: starting {algorithm} on {} values", input.len());
    observer.on_event(StepEvent::Started { algorithm });

    let mut driver = Driver {
        buf: input,
        counters: Counters::default(),
        control,
        observer,
    };

    let result = match algorithm {
        Algorithm::Bubble => driver.bubble().await,
        Algorithm::Insertion => driver.insertion().await,
        Algorithm::Selection => driver.selection().await,
        Algorithm::Quick => match driver.buf.len().checked_sub(1) {
            Some(last) => driver.quick(0, last).await,
            None => Ok(()),
        },
        Algorithm::Merge => match driver.buf.len().checked_sub(1) {
            Some(last) => driver.merge_sort(0, last).await,
            None => Ok(()),
        },
    };

    if let Err(e) = result {
        log::debug!(
            "engine: {algorithm} stopped after {} comparisons, {} writes: {e}",
            driver.counters.comparisons,
            driver.counters.writes
        );
        return Err(e);
    }

    let Driver { buf, counters, .. } = driver;
    log::debug!(
        "engine: {algorithm} finished with {} comparisons, {} writes",
        counters.comparisons,
        counters.writes
    );
    observer.on_event(StepEvent::Finished {
        algorithm,
        array: Arc::from(buf.as_slice()),
        counters,
    });

    Ok(buf)
}

/// Working state shared by every step of one run, including recursive calls.
struct Driver<'a, T> {
    buf: Vec<T>,
    counters: Counters,
    control: &'a Control,
    observer: &'a dyn Observer<T>,
}

impl<T> Driver<'_, T>
where
    T: Ord + Clone + Send + Sync,
{
    fn compare(&mut self) {
        self.counters.comparisons += 1;
        self.observer.on_event(StepEvent::Compared {
            counters: self.counters,
        });
    }

    /// Counts a write that was just made, then publishes and suspends.
    async fn write(&mut self) -> Result<(), EngineError> {
        self.counters.writes += 1;
        self.publish().await
    }

    /// Publishes the buffer without counting, then suspends.
    async fn publish(&mut self) -> Result<(), EngineError> {
        self.observer.on_event(StepEvent::Snapshot {
            array: Arc::from(self.buf.as_slice()),
            counters: self.counters,
        });
        self.control.suspend().await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Observer that keeps every event.
    pub(crate) struct Recorder<T> {
        pub events: Mutex<Vec<StepEvent<T>>>,
    }

    impl<T> Default for Recorder<T> {
        fn default() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }
    }

    impl<T: Send + Sync> Observer<T> for Recorder<T> {
        fn on_event(&self, event: StepEvent<T>) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl<T: Clone> Recorder<T> {
        pub fn events(&self) -> Vec<StepEvent<T>> {
            self.events.lock().unwrap().clone()
        }

        pub fn snapshots(&self) -> Vec<Vec<T>> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    StepEvent::Snapshot { array, .. } => Some(array.to_vec()),
                    _ => None,
                })
                .collect()
        }

        pub fn finished(&self) -> Option<(Vec<T>, Counters)> {
            self.events().into_iter().find_map(|event| match event {
                StepEvent::Finished {
                    array, counters, ..
                } => Some((array.to_vec(), counters)),
                _ => None,
            })
        }
    }

    /// Runs to completion with no delay and returns the output, final
    /// counters and the recorder.
    pub(crate) async fn sort_recorded<T>(
        algorithm: Algorithm,
        input: Vec<T>,
    ) -> (Vec<T>, Counters, Recorder<T>)
    where
        T: Ord + Clone + Send + Sync,
    {
        let control = Control::new(0);
        let recorder = Recorder::<T>::default();
        let output = run(algorithm, input, &control, &recorder)
            .await
            .expect("run is never cancelled");
        let (_, counters) = recorder.finished().expect("finished event");
        (output, counters, recorder)
    }
}
