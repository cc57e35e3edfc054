//! Ripper-compatible token stream adapter for modern Ruby lexers.
//!
//! A modern lexer and Ripper tokenize the same source very differently in
//! two places: heredoc bodies (emitted inline after the opener upstream,
//! in source order by Ripper) and dedenting heredocs (`<<~`), where Ripper
//! emits `on_ignored_sp` tokens for the elided indentation that the
//! upstream encodes as a post-parse node rewrite. [`lex_compat`] folds an
//! upstream token stream into Ripper's shape so a conformance harness can
//! compare the two position-by-position.
//!
//! - Lexing itself is delegated to the caller through [`UpstreamLexer`].
//! - Output tokens are Ripper 4-tuples with per-event equality relaxations
//!   (see [`token::Flavor`]) for the documented deliberate divergences.

pub mod compat;
pub mod error;
mod heredoc;
pub mod location;
pub mod state;
pub mod token;
pub mod upstream;

// Re-exports for convenience
pub use compat::{compat_tokens, lex_compat, LexCompat};
pub use token::{Event, Flavor, ReferenceToken, Token};
pub use upstream::{Lexed, TokenKind, UpstreamLexer, UpstreamToken};
