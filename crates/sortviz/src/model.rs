use crate::algorithm::Algorithm;
use std::sync::Arc;

pub const MIN_SIZE: usize = 5;
pub const MAX_SIZE: usize = 100;
pub const DEFAULT_SIZE: usize = 30;

pub const MIN_DELAY_MS: u64 = 10;
pub const MAX_DELAY_MS: u64 = 1000;
pub const DEFAULT_DELAY_MS: u64 = 50;

/// Generated values are drawn from this range.
pub const MIN_VALUE: i64 = 10;
pub const MAX_VALUE: i64 = 410;

/// Running counters of a sort.
///
/// `writes` counts every element movement into the buffer, which includes
/// real two-element exchanges as well as insertion shifts and merge
/// placements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub comparisons: u64,
    pub writes: u64,
}

/// Caller-owned settings. Every setter clamps to the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    size: usize,
    delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl Config {
    pub fn new(size: usize, delay_ms: u64) -> Self {
        let mut config = Self::default();
        config.set_size(size);
        config.set_delay_ms(delay_ms);
        config
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn set_size(&mut self, size: usize) {
        self.size = size.clamp(MIN_SIZE, MAX_SIZE);
    }

    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS);
    }
}

/// State of the current (or last) run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    pub algorithm: Option<Algorithm>,
    pub running: bool,
    pub paused: bool,
    pub sorted: bool,
    pub counters: Counters,
    pub message: String,
}

impl RunState {
    /// Clears counters and the sorted flag, keeping the rest.
    pub fn reset(&mut self) {
        self.counters = Counters::default();
        self.sorted = false;
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct Model {
    pub array: Arc<[i64]>,
    pub state: RunState,
    pub config: Config,
}

impl Model {
    pub fn tone(&self) -> BarTone {
        BarTone::from_sorted(self.state.sorted)
    }
}

/// Width of a single bar, in pixels of an 800 pixel wide canvas.
pub fn bar_width(size: usize) -> f64 {
    if size == 0 {
        return 20.0;
    }
    (800.0 / size as f64).clamp(2.0, 20.0)
}

/// Bars are drawn in one of two tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarTone {
    InProgress,
    Sorted,
}

impl BarTone {
    pub fn from_sorted(sorted: bool) -> Self {
        if sorted {
            BarTone::Sorted
        } else {
            BarTone::InProgress
        }
    }
}
