use crate::traffic::Simulation;
use crate::util::parsers::*;
use derive_more::with_trait::{Display, Error, From};
use nom::error::{Error as ParseError, ErrorKind};
use nom::{branch::*, bytes::complete::*, combinator::*, sequence::*, *};
use std::num::NonZeroUsize;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Inbound {
    Traverse(usize),
    Width,
    Tally,
    Reset,
    Simulate {
        tokens: Option<u64>,
        threads: Option<NonZeroUsize>,
        seed: Option<u64>,
    },
    IsReady,
    Quit,
}

impl Inbound {
    /// Applies the parameters of [`Inbound::Simulate`] on top of `base`.
    pub fn simulation(&self, base: &Simulation) -> Option<Simulation> {
        match *self {
            Inbound::Simulate {
                tokens,
                threads,
                seed,
            } => Some(Simulation {
                tokens: tokens.unwrap_or(base.tokens),
                threads: threads.unwrap_or(base.threads),
                seed: seed.unwrap_or(base.seed),
            }),

            _ => None,
        }
    }
}

#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseSessionError<'s> {
    #[display("unrecognized sequence `{}`", _0.input)]
    Unrecognized(#[error(not(source))] ParseError<&'s str>),
}

#[derive(Debug, Default)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct SessionParser;

impl SessionParser {
    #[inline(always)]
    pub fn parse<'s>(&mut self, s: &'s str) -> Result<Inbound, ParseSessionError<'s>> {
        let mut cmd = t(alt((
            tag("traverse"),
            tag("width"),
            tag("tally"),
            tag("reset"),
            tag("simulate"),
            tag("isready"),
            tag("quit"),
        )));

        match cmd.parse(s).finish()? {
            (args, "traverse") => {
                let mut traverse = terminated(t(uint).map(Inbound::Traverse), eof);
                let (_, cmd) = traverse.parse(args).finish()?;
                Ok(cmd)
            }

            (args, "simulate") => {
                let tokens = field("tokens", uint);
                let threads = field("threads", uint);
                let seed = field("seed", uint);

                let params = gather3((tokens, threads, seed));
                let mut simulate = terminated(opt(params), eof).map(Option::unwrap_or_default);
                let (_, (tokens, threads, seed)) = simulate.parse(args).finish()?;
                Ok(Inbound::Simulate {
                    tokens,
                    threads,
                    seed,
                })
            }

            ("", "width") => Ok(Inbound::Width),
            ("", "tally") => Ok(Inbound::Tally),
            ("", "reset") => Ok(Inbound::Reset),
            ("", "isready") => Ok(Inbound::IsReady),
            ("", "quit") => Ok(Inbound::Quit),

            (args, _) => Err(ParseError::new(args, ErrorKind::Eof).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_strategy::proptest;

    #[proptest]
    fn parsing_traverse_succeeds(mut p: SessionParser, port: usize) {
        assert_eq!(p.parse(&format!("traverse {port}")), Ok(Inbound::Traverse(port)));
    }

    #[proptest]
    fn parsing_traverse_tolerates_whitespace(
        mut p: SessionParser,
        port: usize,
        #[strategy("[ \t]*")] l: String,
        #[strategy("[ \t]+")] m: String,
        #[strategy("[ \t]*")] r: String,
    ) {
        let input = format!("{l}traverse{m}{port}{r}");
        assert_eq!(p.parse(&input), Ok(Inbound::Traverse(port)));
    }

    #[proptest]
    fn parsing_traverse_fails_for_negative_port(
        mut p: SessionParser,
        #[strategy(1usize..)] port: usize,
    ) {
        assert!(p.parse(&format!("traverse -{port}")).is_err());
    }

    #[proptest]
    fn parsing_traverse_fails_without_port(mut p: SessionParser) {
        assert!(p.parse("traverse").is_err());
    }

    #[proptest]
    fn parsing_simulate_succeeds(
        mut p: SessionParser,
        tokens: Option<u64>,
        #[strategy(prop::option::of((1usize..64).prop_filter_map("zero", NonZeroUsize::new)))]
        threads: Option<NonZeroUsize>,
        seed: Option<u64>,
    ) {
        let mut input = String::from("simulate");

        if let Some(seed) = seed {
            input.push_str(&format!(" seed {seed}"));
        }

        if let Some(tokens) = tokens {
            input.push_str(&format!(" tokens {tokens}"));
        }

        if let Some(threads) = threads {
            input.push_str(&format!(" threads {threads}"));
        }

        assert_eq!(
            p.parse(&input),
            Ok(Inbound::Simulate {
                tokens,
                threads,
                seed
            })
        );
    }

    #[proptest]
    fn parsing_simulate_fails_for_zero_threads(mut p: SessionParser) {
        assert!(p.parse("simulate threads 0").is_err());
    }

    #[proptest]
    fn parsing_simulate_fails_for_unknown_parameters(mut p: SessionParser) {
        assert!(p.parse("simulate depth 3").is_err());
    }

    #[proptest]
    fn parsing_width_succeeds(mut p: SessionParser) {
        assert_eq!(p.parse("width"), Ok(Inbound::Width));
    }

    #[proptest]
    fn parsing_tally_succeeds(mut p: SessionParser) {
        assert_eq!(p.parse("tally"), Ok(Inbound::Tally));
    }

    #[proptest]
    fn parsing_reset_succeeds(mut p: SessionParser) {
        assert_eq!(p.parse("reset"), Ok(Inbound::Reset));
    }

    #[proptest]
    fn parsing_isready_succeeds(mut p: SessionParser) {
        assert_eq!(p.parse("isready"), Ok(Inbound::IsReady));
    }

    #[proptest]
    fn parsing_quit_succeeds(mut p: SessionParser) {
        assert_eq!(p.parse("quit"), Ok(Inbound::Quit));
    }

    #[proptest]
    fn parsing_command_with_trailing_garbage_fails(mut p: SessionParser) {
        assert!(p.parse("widthx").is_err());
        assert!(p.parse("quit now").is_err());
    }

    #[proptest]
    fn parsing_invalid_command_fails(
        mut p: SessionParser,
        #[filter(!["traverse", "width", "tally", "reset", "simulate", "isready", "quit"]
            .iter().any(|c| #s.trim_start().starts_with(c)))]
        s: String,
    ) {
        assert!(p.parse(&s).is_err());
    }

    #[proptest]
    fn simulate_overrides_base_parameters(
        base: Simulation,
        tokens: Option<u64>,
        seed: Option<u64>,
    ) {
        let cmd = Inbound::Simulate {
            tokens,
            threads: None,
            seed,
        };

        assert_eq!(
            cmd.simulation(&base),
            Some(Simulation {
                tokens: tokens.unwrap_or(base.tokens),
                threads: base.threads,
                seed: seed.unwrap_or(base.seed),
            })
        );
    }

    #[proptest]
    fn only_simulate_describes_a_simulation(base: Simulation, port: usize) {
        assert_eq!(Inbound::Traverse(port).simulation(&base), None);
        assert_eq!(Inbound::Quit.simulation(&base), None);
    }
}
