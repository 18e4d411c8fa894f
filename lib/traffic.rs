mod simulation;
mod tally;

pub use simulation::*;
pub use tally::*;
