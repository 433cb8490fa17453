//! Adapter implementations of the port traits.
//!
//! - `live`: the real OS streams, random tokens, and `sh`.
//! - `null` and `capturing`: sinks installed by redirection scopes.
//! - `sequence`: predictable tokens.

pub mod capturing;
pub mod live;
pub mod null;
pub mod sequence;
