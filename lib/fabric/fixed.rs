use crate::fabric::{Switch, Toggle};
use derive_more::with_trait::{Deref, From};

/// A switch that always makes the same decision.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Deref, From)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Fixed(pub Toggle);

impl Switch for Fixed {
    #[inline(always)]
    fn traverse(&self) -> Toggle {
        self.0
    }
}
