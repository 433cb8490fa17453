//! Live adapters for real external interactions.

pub mod shell;
pub mod sink;
pub mod token;
