//! Path token grammar.
//!
//! ```text
//! WIDTH (x HEIGHT)? (@ DPR x)? (. FORMAT)? (/ dark)?
//! ```
//!
//! `WIDTH`/`HEIGHT` are ASCII digits, `DPR` is digits with at most one fractional digit,
//! `FORMAT` is ASCII word characters. The whole token must match; nothing is left over.

use std::fmt;

pub(crate) mod scanner;

pub use scanner::tokenize;

/// Literal that marks the dark theme, after a `/`.
pub const DARK_MARKER: &str = "dark";

/// Raw field text exactly as it appeared in the token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawFields {
    pub width: String,
    pub height: Option<String>,
    pub dpr: Option<String>,
    pub format: Option<String>,
    pub dark: bool,
}

/// The token does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct MalformedToken {
    pub token: String,
    /// Byte offset of the first byte that could not be matched.
    pub offset: usize,
    pub expected: &'static str,
}

impl fmt::Display for MalformedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "malformed token '{}' at byte {}: expected {}",
            self.token, self.offset, self.expected
        )
    }
}
