use crate::fabric::Toggle;

/// Trait for the binary routing elements of a [`Layer`][`crate::fabric::Layer`].
///
/// Implementations that keep state must synchronize it themselves, since a
/// [`Layer`][`crate::fabric::Layer`] only ever hands out shared references.
pub trait Switch {
    /// Returns the current routing decision.
    ///
    /// This may advance the internal state of the switch, so consecutive calls
    /// are not required to agree.
    fn traverse(&self) -> Toggle;

    /// Restores the initial state.
    #[inline(always)]
    fn reset(&self) {}
}

impl<T: Switch + ?Sized> Switch for &T {
    #[inline(always)]
    fn traverse(&self) -> Toggle {
        (**self).traverse()
    }

    #[inline(always)]
    fn reset(&self) {
        (**self).reset()
    }
}

impl<T: Switch + ?Sized> Switch for Box<T> {
    #[inline(always)]
    fn traverse(&self) -> Toggle {
        (**self).traverse()
    }

    #[inline(always)]
    fn reset(&self) {
        (**self).reset()
    }
}

/// A type-erased [`Switch`] that can be shared across threads.
pub type DynSwitch = Box<dyn Switch + Send + Sync>;
