use thiserror::Error;

use crate::upstream::TokenKind;

/// Compact byte-span used for passthrough diagnostics.
///
/// Upstream lexers report `usize` offsets; we convert to `u32` for
/// compactness. If you need >4GiB inputs, change to `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32, // exclusive
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        // Clamp rather than panic.
        let s = if start > u32::MAX as usize {
            u32::MAX
        } else {
            start as u32
        };
        let e = if end > u32::MAX as usize {
            u32::MAX
        } else {
            end as u32
        };
        Self { start: s, end: e }
    }

    pub const fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// A diagnostic produced by the upstream lexer, forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
}

/// A comment span produced by the upstream lexer, forwarded verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub span: Span,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompatError {
    /// An upstream kind with no Ripper event mapping reached the driver.
    /// This is a programming error in the caller, not a lex error.
    #[error("no Ripper event mapping for upstream token kind {0:?}")]
    UnmappedKind(TokenKind),
}
