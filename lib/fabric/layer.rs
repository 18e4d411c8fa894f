use crate::fabric::{Balancer, Switch};
use derive_more::with_trait::{Display, Error};
use std::any::type_name;
use tracing::debug;

/// The reason why an operation on a [`Layer`] failed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum LayerError {
    #[display("a layer must have at least one port")]
    InvalidConfiguration,
    #[display("port {input} is out of range for width {width}")]
    OutOfRange { input: usize, width: usize },
}

/// One stage of a balancing network.
///
/// Port `i` is paired with its mirror `width - i - 1` and the switch at port
/// `i` decides which of the two a token entering through `i` leaves by.
#[derive(Debug)]
pub struct Layer<S = Balancer> {
    switches: Box<[S]>,
}

impl<S: Default> Layer<S> {
    /// A layer of `width` default constructed switches.
    #[inline(always)]
    pub fn new(width: usize) -> Result<Self, LayerError> {
        Self::with(width, |_| S::default())
    }
}

impl<S> Layer<S> {
    /// A layer of `width` switches, where the switch at port `i` is `f(i)`.
    pub fn with<F: FnMut(usize) -> S>(width: usize, f: F) -> Result<Self, LayerError> {
        if width == 0 {
            return Err(LayerError::InvalidConfiguration);
        }

        debug!(width, switch = type_name::<S>(), "building layer");
        let switches = (0..width).map(f).collect();
        Ok(Layer { switches })
    }

    /// The number of ports.
    #[inline(always)]
    pub fn width(&self) -> usize {
        self.switches.len()
    }

    /// The switches, indexed by port.
    #[inline(always)]
    pub fn switches(&self) -> &[S] {
        &self.switches
    }

    #[inline(always)]
    fn check(&self, input: usize) -> Result<(), LayerError> {
        match self.width() {
            width if input < width => Ok(()),
            width => Err(LayerError::OutOfRange { input, width }),
        }
    }

    #[inline(always)]
    fn pair(width: usize, input: usize) -> (usize, usize) {
        let mirror = width - input - 1;
        if input < width / 2 {
            (input, mirror)
        } else {
            (mirror, input)
        }
    }

    /// The mirror-symmetric partner of `input`.
    #[inline(always)]
    pub fn partner(&self, input: usize) -> Result<usize, LayerError> {
        self.check(input)?;
        Ok(self.width() - input - 1)
    }

    /// The lower and higher ports a token entering through `input` may leave by.
    ///
    /// Unlike [`Layer::traverse`] this never touches a switch.
    #[inline(always)]
    pub fn candidates(&self, input: usize) -> Result<(usize, usize), LayerError> {
        self.check(input)?;
        Ok(Self::pair(self.width(), input))
    }
}

impl<S: Switch> Layer<S> {
    /// Routes a token entering through `input` and returns the port it leaves by.
    #[inline(always)]
    pub fn traverse(&self, input: usize) -> Result<usize, LayerError> {
        self.check(input)?;
        // SAFETY: checked above.
        Ok(unsafe { self.traverse_unchecked(input) })
    }

    /// Routes a token entering through `input` without checking bounds.
    ///
    /// # Safety
    ///
    /// `input` must be less than [`Layer::width`].
    #[inline(always)]
    pub unsafe fn traverse_unchecked(&self, input: usize) -> usize {
        let toggle = unsafe { self.switches.get_unchecked(input) }.traverse();
        let (lo, hi) = Self::pair(self.width(), input);
        toggle.select(lo, hi)
    }

    /// Restores every switch to its initial state.
    #[inline(always)]
    pub fn reset(&self) {
        self.switches.iter().for_each(S::reset);
    }
}
