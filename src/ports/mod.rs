//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the scoping core and the
//! outside world (output destinations, token generation, script execution).
//! Implementations live in `src/adapters/`.

pub mod shell;
pub mod sink;
pub mod token;

pub use shell::{ScriptOutcome, ScriptRunner};
pub use sink::{OutputSink, Stream, StreamSelector};
pub use token::TokenSource;
