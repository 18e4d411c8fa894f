use crate::fabric::{Switch, Toggle};
use atomic::Atomic;
use derive_more::with_trait::Debug;
use std::sync::atomic::Ordering::{AcqRel, Acquire, Release};

/// The balancer of a counting network.
///
/// Tokens leave alternately through the lower and the higher port, starting
/// with the lower one. The toggle is flipped with a single atomic
/// read-modify-write, so concurrent traversals never observe the same state.
#[derive(Debug, Default)]
#[debug("Balancer({:?})", self.peek())]
pub struct Balancer(Atomic<Toggle>);

impl Balancer {
    /// A balancer whose next token leaves through `initial`.
    #[inline(always)]
    pub const fn new(initial: Toggle) -> Self {
        Balancer(Atomic::new(initial))
    }

    /// The decision the next token would get, without consuming it.
    #[inline(always)]
    pub fn peek(&self) -> Toggle {
        self.0.load(Acquire)
    }
}

impl Switch for Balancer {
    #[inline(always)]
    fn traverse(&self) -> Toggle {
        match self.0.fetch_update(AcqRel, Acquire, |t| Some(!t)) {
            Ok(t) | Err(t) => t,
        }
    }

    #[inline(always)]
    fn reset(&self) {
        self.0.store(Toggle::Lo, Release);
    }
}
