use crate::fabric::{Layer, LayerError, Switch};
use crate::{traffic::Tally, util::thread};
use derive_more::with_trait::{Display, Error, From};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use std::{io, thread::available_parallelism};
use tracing::{debug, info};

#[cfg(test)]
use proptest::prelude::*;

/// The reason why a [`Simulation`] failed.
#[derive(Debug, Display, Error, From)]
pub enum SimulationError {
    #[display("failed to spawn worker thread")]
    Spawn(io::Error),
    #[display("failed to route token")]
    Layer(LayerError),
}

/// Uniformly random traffic pushed through a [`Layer`] by concurrent workers.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(default, deny_unknown_fields)]
pub struct Simulation {
    /// The number of worker threads.
    ///
    /// At most [`Simulation::MAX_THREADS`] and never more than one per token are spawned.
    #[cfg_attr(test, strategy((1usize..=4).prop_filter_map("zero", NonZeroUsize::new)))]
    pub threads: NonZeroUsize,

    /// The total number of tokens.
    #[cfg_attr(test, strategy(..1024u64))]
    pub tokens: u64,

    /// Worker `i` draws its inputs from a generator seeded with `seed + i`.
    pub seed: u64,
}

impl Default for Simulation {
    #[inline(always)]
    fn default() -> Self {
        Simulation {
            threads: available_parallelism().unwrap_or(NonZeroUsize::MIN),
            tokens: 1 << 16,
            seed: 0,
        }
    }
}

impl Simulation {
    /// The maximum number of worker threads spawned by [`Simulation::run`].
    pub const MAX_THREADS: usize = 256;

    /// The number of worker threads actually spawned.
    #[inline(always)]
    pub fn workers(&self) -> usize {
        let tokens = usize::try_from(self.tokens).unwrap_or(usize::MAX);
        self.threads.get().min(tokens).clamp(1, Self::MAX_THREADS)
    }

    /// The number of tokens worker `idx` pushes.
    #[inline(always)]
    fn share(&self, idx: usize) -> u64 {
        let workers = self.workers() as u64;
        self.tokens / workers + ((idx as u64) < self.tokens % workers) as u64
    }

    /// Pushes the traffic through `layer` and tallies where every token leaves.
    pub fn run<S: Switch + Sync>(&self, layer: &Layer<S>) -> Result<Report, SimulationError> {
        let (threads, tokens, seed) = (self.workers(), self.tokens, self.seed);
        debug!(threads, tokens, seed, "simulating");

        let width = layer.width();
        let tally = Tally::new(width);
        let timer = Instant::now();

        std::thread::scope(|s| {
            let mut workers = Vec::with_capacity(threads);
            for idx in 0..threads {
                let (tally, tokens) = (&tally, self.share(idx));
                let mut rng = SmallRng::seed_from_u64(self.seed.wrapping_add(idx as u64));
                let name = format!("junction-worker-{idx}");
                workers.push(thread::spawn_scoped(s, &name, move || {
                    (0..tokens).try_for_each(|_| {
                        let output = layer.traverse(rng.random_range(0..width))?;
                        tally.record(output)
                    })
                })?);
            }

            workers.into_iter().try_for_each(|w| w.join())?;
            Ok::<_, SimulationError>(())
        })?;

        let report = Report {
            tokens: tally.total(),
            time: timer.elapsed(),
            counts: tally.counts(),
        };

        let ms = report.time.as_millis() as u64;
        info!(tokens = report.tokens, ms, spread = tally.spread(), "simulation done");
        Ok(report)
    }
}

/// The outcome of a [`Simulation`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Report {
    /// The number of tokens routed.
    pub tokens: u64,
    /// The time it took.
    pub time: Duration,
    /// The number of tokens that left through each port.
    pub counts: Vec<u64>,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ms = self.time.as_millis();
        let tps = self.tokens as u128 * 1000 / ms.max(1);
        write!(f, "report tokens {} time {ms} tps {tps} counts", self.tokens)?;

        for c in &self.counts {
            write!(f, " {c}")?;
        }

        Ok(())
    }
}
