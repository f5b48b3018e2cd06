use std::collections::VecDeque;
use std::time::Duration;

/// Number of samples kept by the measurement pipeline.
pub const WINDOW_CAPACITY: usize = 100;

/// Fixed-capacity buffer of latency samples in chronological order.
/// Appending to a full window evicts exactly the oldest sample.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    /// Capacity must be at least 1.
    pub fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity >= 1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample to the tail, evicting the head once the window is
    /// over capacity. One append removes at most one sample.
    pub fn append(&mut self, sample: Duration) {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Arithmetic mean of the current contents, truncating to the
    /// underlying nanosecond representation. `None` while the window is
    /// empty.
    pub fn average(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let total: Duration = self.samples.iter().sum();
        Some(total / self.samples.len() as u32)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples oldest-first.
    pub fn samples(&self) -> impl Iterator<Item = Duration> + '_ {
        self.samples.iter().copied()
    }
}
