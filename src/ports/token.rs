//! Source of the unique tokens embedded in temporary path names.

/// Produces the `<token>` part of `<prefix><token><suffix>`.
///
/// Tokens must be usable as a single path component: no separators, no
/// leading dot, and distinct from every other token handed out in this
/// process. Tests swap in a predictable source to assert on exact names.
pub trait TokenSource: Send + Sync {
    /// Returns a token that has not been returned before.
    fn next_token(&self) -> String;
}
