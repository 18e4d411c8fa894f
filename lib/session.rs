mod inbound;
mod outbound;

pub use inbound::*;
pub use outbound::*;

use crate::fabric::{DynSwitch, Layer, Switch};
use crate::traffic::{Simulation, Tally};
use futures::prelude::*;
use tracing::warn;

/// A line protocol session over a single [`Layer`].
#[derive(Debug)]
pub struct Session<I, O, S = DynSwitch> {
    input: I,
    output: O,
    layer: Layer<S>,
    tally: Tally,
    simulation: Simulation,
}

impl<I, O, S> Session<I, O, S> {
    /// Constructs a new session that routes tokens through `layer`.
    pub fn new(input: I, output: O, layer: Layer<S>) -> Self {
        let tally = Tally::new(layer.width());
        Self {
            input,
            output,
            layer,
            tally,
            simulation: Simulation::default(),
        }
    }

    /// Sets the defaults for parameters omitted by `simulate`.
    #[must_use]
    pub fn with_simulation(mut self, simulation: Simulation) -> Self {
        self.simulation = simulation;
        self
    }

    /// The layer tokens are routed through.
    pub fn layer(&self) -> &Layer<S> {
        &self.layer
    }

    /// Where tokens routed by `traverse` left.
    pub fn tally(&self) -> &Tally {
        &self.tally
    }
}

impl<I, O, S> Session<I, O, S>
where
    I: Stream<Item = Inbound> + Unpin,
    O: Sink<Outbound> + Unpin,
    S: Switch + Sync,
{
    /// Runs the session until the input ends or `quit` is received.
    pub async fn run(&mut self) -> Result<(), O::Error> {
        while let Some(inbound) = self.input.next().await {
            match inbound {
                Inbound::Traverse(input) => {
                    let routed = self.layer.traverse(input).and_then(|output| {
                        self.tally.record(output)?;
                        Ok(output)
                    });

                    let outbound = match routed {
                        Ok(output) => Outbound::Routed { input, output },
                        Err(e) => {
                            warn!(input, "rejected token, {e}");
                            Outbound::Error(e.to_string())
                        }
                    };

                    self.output.send(outbound).await?;
                }

                Inbound::Simulate { .. } => {
                    let Some(simulation) = inbound.simulation(&self.simulation) else {
                        continue;
                    };

                    let outbound = match simulation.run(&self.layer) {
                        Ok(report) => report.into(),
                        Err(e) => {
                            warn!("simulation failed, {e}");
                            Outbound::Error(e.to_string())
                        }
                    };

                    self.output.send(outbound).await?;
                }

                Inbound::Reset => {
                    self.layer.reset();
                    self.tally.clear();
                }

                Inbound::Width => self.output.send(Outbound::Width(self.layer.width())).await?,
                Inbound::Tally => self.output.send(Outbound::from(&self.tally)).await?,
                Inbound::IsReady => self.output.send(Outbound::ReadyOk).await?,
                Inbound::Quit => break,
            }
        }

        Ok(())
    }
}
