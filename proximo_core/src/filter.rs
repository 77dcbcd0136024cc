//! Sliding-window median filter for raw distance samples.
use std::collections::VecDeque;

/// Fixed-capacity FIFO window returning the median of its current contents
/// on every push. Partial windows (fewer samples than capacity) are filtered
/// as-is: the median of k samples is index k/2 of the sorted copy.
#[derive(Debug)]
pub struct MedianFilter {
    window: VecDeque<f32>,
    capacity: usize,
    // Preallocated scratch to sort without per-push allocation.
    scratch: Vec<f32>,
}

impl MedianFilter {
    pub const DEFAULT_WINDOW: usize = 5;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            scratch: Vec::with_capacity(capacity),
        }
    }

    /// Push a sample, evicting the oldest when the window is full, and
    /// return the median of the current contents.
    pub fn push(&mut self, sample: f32) -> f32 {
        self.window.push_back(sample);
        if self.window.len() > self.capacity {
            self.window.pop_front();
        }
        self.scratch.clear();
        self.scratch.extend(self.window.iter().copied());
        self.scratch.sort_unstable_by(f32::total_cmp);
        self.scratch[self.scratch.len() / 2]
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

impl Default for MedianFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}
