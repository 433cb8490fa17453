//! Random path tokens.

use uuid::Uuid;

use crate::ports::token::TokenSource;

/// Tokens from UUID v4 in simple form: 32 lowercase hex digits, no hyphens.
///
/// 122 random bits make collisions between concurrent callers, or with a
/// leftover path from an earlier run, negligible without any coordination.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn next_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
