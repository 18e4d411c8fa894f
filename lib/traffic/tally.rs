use crate::fabric::LayerError;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

/// Counts the tokens that left through each port of a layer.
#[derive(Debug)]
pub struct Tally {
    counts: Box<[AtomicU64]>,
}

impl Tally {
    /// An empty tally for `width` ports.
    #[inline(always)]
    pub fn new(width: usize) -> Self {
        Tally {
            counts: (0..width).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// The number of ports.
    #[inline(always)]
    pub fn width(&self) -> usize {
        self.counts.len()
    }

    /// Counts one token leaving through `output`.
    #[inline(always)]
    pub fn record(&self, output: usize) -> Result<(), LayerError> {
        let Some(count) = self.counts.get(output) else {
            let width = self.width();
            return Err(LayerError::OutOfRange { input: output, width });
        };

        count.fetch_add(1, Relaxed);
        Ok(())
    }

    /// The number of tokens that left through `port`.
    #[inline(always)]
    pub fn count(&self, port: usize) -> Option<u64> {
        Some(self.counts.get(port)?.load(Relaxed))
    }

    /// A snapshot of every count, indexed by port.
    #[inline(always)]
    pub fn counts(&self) -> Vec<u64> {
        self.counts.iter().map(|c| c.load(Relaxed)).collect()
    }

    /// The number of tokens counted so far.
    #[inline(always)]
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.load(Relaxed)).sum()
    }

    /// The difference between the busiest and the idlest port.
    #[inline(always)]
    pub fn spread(&self) -> u64 {
        let counts = self.counts();
        let max = counts.iter().max().copied().unwrap_or(0);
        let min = counts.iter().min().copied().unwrap_or(0);
        max - min
    }

    /// Zeroes every count.
    #[inline(always)]
    pub fn clear(&self) {
        self.counts.iter().for_each(|c| c.store(0, Relaxed));
    }
}
