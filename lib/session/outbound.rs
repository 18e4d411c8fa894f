use crate::traffic::{Report, Tally};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Outbound {
    Routed { input: usize, output: usize },
    Width(usize),
    Tally(Vec<u64>),
    Report(Report),
    ReadyOk,
    Error(String),
}

impl From<&Tally> for Outbound {
    fn from(tally: &Tally) -> Self {
        Outbound::Tally(tally.counts())
    }
}

impl From<Report> for Outbound {
    fn from(report: Report) -> Self {
        Outbound::Report(report)
    }
}

impl Display for Outbound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Outbound::Routed { input, output } => write!(f, "routed {input} {output}"),
            Outbound::Width(width) => write!(f, "width {width}"),
            Outbound::Tally(counts) => {
                write!(f, "tally total {} counts", counts.iter().sum::<u64>())?;
                for c in counts {
                    write!(f, " {c}")?;
                }

                Ok(())
            }

            Outbound::Report(report) => Display::fmt(report, f),
            Outbound::ReadyOk => f.write_str("readyok"),
            Outbound::Error(e) => write!(f, "error {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{collection::vec, prelude::*};
    use std::time::Duration;
    use test_strategy::proptest;

    #[proptest]
    fn routed_is_printed_with_both_ports(input: usize, output: usize) {
        let routed = Outbound::Routed { input, output };
        assert_eq!(routed.to_string(), format!("routed {input} {output}"));
    }

    #[proptest]
    fn width_is_printed(w: usize) {
        assert_eq!(Outbound::Width(w).to_string(), format!("width {w}"));
    }

    #[proptest]
    fn tally_is_printed_with_total(#[strategy(vec(..1000u64, ..8))] counts: Vec<u64>) {
        let total: u64 = counts.iter().sum();
        let printed = Outbound::Tally(counts.clone()).to_string();
        let expected = format!("tally total {total} counts");
        assert!(printed.starts_with(&expected));
        assert_eq!(printed.split_whitespace().count(), 4 + counts.len());
    }

    #[proptest]
    fn tally_mirrors_counts(#[strategy(1usize..8)] w: usize, #[strategy(..#w)] p: usize) {
        let tally = Tally::new(w);
        tally.record(p)?;
        assert_eq!(Outbound::from(&tally), Outbound::Tally(tally.counts()));
    }

    #[proptest]
    fn report_is_printed_as_is(tokens: u64, #[strategy(vec(any::<u64>(), ..8))] counts: Vec<u64>) {
        let report = Report {
            tokens,
            time: Duration::from_millis(3),
            counts,
        };

        assert_eq!(Outbound::from(report.clone()).to_string(), report.to_string());
    }

    #[test]
    fn readyok_is_printed() {
        assert_eq!(Outbound::ReadyOk.to_string(), "readyok");
    }

    #[proptest]
    fn error_is_printed_with_prefix(e: String) {
        assert_eq!(Outbound::Error(e.clone()).to_string(), format!("error {e}"));
    }
}
