use crate::fabric::{Balancer, DynSwitch, Fixed, Layer, LayerError, Random, Toggle};
use crate::traffic::Simulation;
use derive_more::with_trait::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::{fs::File, io, path::Path, str::FromStr};
use tracing::debug;

/// The kind of [`Switch`][`crate::fabric::Switch`] that populates a layer.
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum SwitchKind {
    /// An alternating [`Balancer`].
    #[default]
    #[display("balancer")]
    Balancer,
    /// A [`Fixed`] switch.
    #[display("{}", _0.select("lo", "hi"))]
    Fixed(Toggle),
    /// A [`Random`] switch, seeded with `seed` plus its port.
    #[display("random:{seed}")]
    Random { seed: u64 },
}

impl SwitchKind {
    /// Builds the switch for `port`.
    #[inline(always)]
    pub fn build(self, port: usize) -> DynSwitch {
        match self {
            SwitchKind::Balancer => Box::new(Balancer::default()),
            SwitchKind::Fixed(t) => Box::new(Fixed(t)),
            SwitchKind::Random { seed } => Box::new(Random::new(seed.wrapping_add(port as u64))),
        }
    }
}

/// The reason why parsing [`SwitchKind`] failed.
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[display("expected one of `balancer`, `lo`, `hi`, `random` or `random:<seed>`")]
pub struct ParseSwitchKindError;

impl FromStr for SwitchKind {
    type Err = ParseSwitchKindError;

    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None if s == "balancer" => Ok(SwitchKind::Balancer),
            None if s == "lo" => Ok(SwitchKind::Fixed(Toggle::Lo)),
            None if s == "hi" => Ok(SwitchKind::Fixed(Toggle::Hi)),
            None if s == "random" => Ok(SwitchKind::Random { seed: 0 }),
            Some(("random", seed)) => match seed.parse() {
                Ok(seed) => Ok(SwitchKind::Random { seed }),
                Err(_) => Err(ParseSwitchKindError),
            },
            _ => Err(ParseSwitchKindError),
        }
    }
}

/// The reason why loading [`Config`] failed.
#[derive(Debug, Display, Error, From)]
pub enum ConfigError {
    #[display("failed to read configuration")]
    Io(io::Error),
    #[display("failed to parse configuration")]
    Parse(ron::error::SpannedError),
}

/// Everything needed to build and exercise a [`Layer`].
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The number of ports.
    #[cfg_attr(test, strategy(1usize..64))]
    pub width: usize,

    /// The switch at every port.
    pub switch: SwitchKind,

    /// Traffic for the `simulate` command.
    pub simulation: Simulation,
}

impl Default for Config {
    #[inline(always)]
    fn default() -> Self {
        Config {
            width: 8,
            switch: SwitchKind::default(),
            simulation: Simulation::default(),
        }
    }
}

impl Config {
    /// Reads a configuration written in RON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading configuration");
        Ok(ron::de::from_reader(File::open(path)?)?)
    }

    /// Builds the configured layer.
    #[inline(always)]
    pub fn layer(&self) -> Result<Layer<DynSwitch>, LayerError> {
        Layer::with(self.width, |port| self.switch.build(port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fabric::Switch;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_strategy::proptest;

    #[proptest]
    fn parsing_printed_switch_kind_is_an_identity(k: SwitchKind) {
        assert_eq!(k.to_string().parse(), Ok(k));
    }

    #[proptest]
    fn parsing_switch_kind_fails_for_invalid_seed(
        #[filter(#s.parse::<u64>().is_err())] s: String,
    ) {
        assert_eq!(format!("random:{s}").parse::<SwitchKind>(), Err(ParseSwitchKindError));
    }

    #[test]
    fn bare_random_switch_kind_is_seeded_with_zero() {
        assert_eq!("random".parse(), Ok(SwitchKind::Random { seed: 0 }));
    }

    #[proptest]
    fn fixed_kind_builds_fixed_switches(t: Toggle, port: usize) {
        assert_eq!(SwitchKind::Fixed(t).build(port).traverse(), t);
    }

    #[proptest]
    fn random_kind_seeds_switches_by_port(seed: u64, port: usize) {
        let a = SwitchKind::Random { seed }.build(port);
        let b = Random::new(seed.wrapping_add(port as u64));
        for _ in 0..32 {
            assert_eq!(a.traverse(), b.traverse());
        }
    }

    #[proptest]
    fn config_builds_layer_of_configured_width(c: Config) {
        assert_eq!(c.layer()?.width(), c.width);
    }

    #[proptest]
    fn config_rejects_zero_width(c: Config) {
        let c = Config { width: 0, ..c };
        assert_eq!(c.layer().err(), Some(LayerError::InvalidConfiguration));
    }

    #[proptest]
    fn config_can_be_loaded_from_file(c: Config) {
        let mut file = NamedTempFile::new()?;
        file.write_all(ron::ser::to_string(&c)?.as_bytes())?;
        assert_eq!(Config::load(file.path())?, c);
    }

    #[test]
    fn missing_fields_take_default_values() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"(width: 4, switch: Fixed(Hi))")?;
        let c = Config::load(file.path())?;
        assert_eq!(c.width, 4);
        assert_eq!(c.switch, SwitchKind::Fixed(Toggle::Hi));
        assert_eq!(c.simulation, Simulation::default());
        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"(width: 4, depth: 2)")?;
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse(_))));
        Ok(())
    }

    #[test]
    fn loading_missing_file_fails() {
        let path = Path::new("/nonexistent/junction.ron");
        assert!(matches!(Config::load(path), Err(ConfigError::Io(_))));
    }
}
