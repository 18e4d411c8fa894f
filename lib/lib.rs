/// Configuration.
pub mod config;
/// Balancers and the routing stage they populate.
pub mod fabric;
/// Line protocol.
pub mod session;
/// Traffic generation and statistics.
pub mod traffic;
/// Assorted utilities.
pub mod util;
