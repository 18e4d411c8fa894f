use crate::fabric::{Switch, Toggle};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use std::sync::{Mutex, PoisonError};

/// A switch that makes seeded pseudo-random decisions.
#[derive(Debug)]
pub struct Random {
    seed: u64,
    rng: Mutex<SmallRng>,
}

impl Default for Random {
    #[inline(always)]
    fn default() -> Self {
        Self::new(0)
    }
}

impl Random {
    /// A switch whose decisions are derived from `seed`.
    #[inline(always)]
    pub fn new(seed: u64) -> Self {
        Random {
            seed,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// The seed this switch was created with.
    #[inline(always)]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Switch for Random {
    #[inline(always)]
    fn traverse(&self) -> Toggle {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random::<bool>().into()
    }

    #[inline(always)]
    fn reset(&self) {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        *rng = SmallRng::seed_from_u64(self.seed);
    }
}
