use bytemuck::NoUninit;
use derive_more::with_trait::{Display, Error};
use serde::{Deserialize, Serialize};
use std::{ops::Not, str::FromStr};

/// The decision of a binary [`Switch`][`crate::fabric::Switch`].
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(NoUninit, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(u8)]
pub enum Toggle {
    /// Route to the lower of the two candidate ports.
    #[default]
    #[display("0")]
    Lo = 0,
    /// Route to the higher of the two candidate ports.
    #[display("1")]
    Hi = 1,
}

impl Toggle {
    /// Picks `lo` or `hi` according to this decision.
    #[inline(always)]
    pub fn select<T>(self, lo: T, hi: T) -> T {
        match self {
            Toggle::Lo => lo,
            Toggle::Hi => hi,
        }
    }
}

impl Not for Toggle {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        match self {
            Toggle::Lo => Toggle::Hi,
            Toggle::Hi => Toggle::Lo,
        }
    }
}

impl From<bool> for Toggle {
    #[inline(always)]
    fn from(b: bool) -> Self {
        if b { Toggle::Hi } else { Toggle::Lo }
    }
}

impl From<Toggle> for bool {
    #[inline(always)]
    fn from(t: Toggle) -> Self {
        t == Toggle::Hi
    }
}

impl From<Toggle> for u8 {
    #[inline(always)]
    fn from(t: Toggle) -> Self {
        t as u8
    }
}

/// The reason why converting or parsing [`Toggle`] failed.
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[display("a toggle is either 0 or 1")]
pub struct ParseToggleError;

impl TryFrom<u8> for Toggle {
    type Error = ParseToggleError;

    #[inline(always)]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Toggle::Lo),
            1 => Ok(Toggle::Hi),
            _ => Err(ParseToggleError),
        }
    }
}

impl FromStr for Toggle {
    type Err = ParseToggleError;

    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "lo" => Ok(Toggle::Lo),
            "1" | "hi" => Ok(Toggle::Hi),
            _ => Err(ParseToggleError),
        }
    }
}
