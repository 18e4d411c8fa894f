mod balancer;
mod fixed;
mod layer;
mod random;
mod switch;
mod toggle;

pub use balancer::*;
pub use fixed::*;
pub use layer::*;
pub use random::*;
pub use switch::*;
pub use toggle::*;
