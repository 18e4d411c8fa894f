pub mod parsers;
pub mod thread;
