//! The stream driver.
//!
//! One fold over the upstream `(token, state)` pairs produces the
//! Ripper-shaped stream: heredoc bodies are held back and re-emitted after
//! the line that opened them, the BOM and regexp-end quirks of the
//! reference are reproduced, and the trailing end-of-input token is
//! stripped because Ripper never reports it.

use std::borrow::Cow;

use smallvec::SmallVec;

use crate::error::{Comment, CompatError, Diagnostic};
use crate::heredoc::Heredoc;
use crate::location::LineIndex;
use crate::state::{self, StateSet};
use crate::token::{Event, Token};
use crate::upstream::{Lexed, TokenKind, UpstreamLexer, UpstreamToken};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// The result of [`lex_compat`]: Ripper-shaped tokens plus the upstream
/// comment and diagnostic lists, forwarded verbatim.
#[derive(Debug)]
pub struct LexCompat<'src> {
    pub tokens: Vec<Token<'src>>,
    pub comments: Vec<Comment>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// Lexes `source` through `upstream` once and adapts the token stream for
/// comparison against Ripper's output.
pub fn lex_compat<'src, U>(
    source: &'src [u8],
    upstream: &U,
) -> Result<LexCompat<'src>, CompatError>
where
    U: UpstreamLexer + ?Sized,
{
    let Lexed {
        tokens: pairs,
        comments,
        errors,
        warnings,
    } = upstream.lex(source);
    let tokens = compat_tokens(source, &pairs)?;
    Ok(LexCompat {
        tokens,
        comments,
        errors,
        warnings,
    })
}

// =============================================================================
// Reorder state machine
// =============================================================================

/// Where the driver stands relative to heredoc buffering. Lives for the
/// duration of one `lex` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    /// No heredoc in flight: tokens go straight to the output.
    Default,
    /// An opener was seen; body tokens buffer into the top accumulator.
    HeredocOpened,
    /// The closer was buffered; waiting for the end of the opener's line to
    /// flush every pending accumulator.
    HeredocClosed,
}

/// The transform core: adapts already-lexed upstream pairs against `source`.
///
/// This is what [`lex_compat`] runs after calling the upstream lexer; test
/// harnesses with scripted token streams can call it directly.
pub fn compat_tokens<'src>(
    source: &'src [u8],
    pairs: &[(UpstreamToken, u32)],
) -> Result<Vec<Token<'src>>, CompatError> {
    let index = LineIndex::new(source);
    let bom = source.starts_with(BOM);

    let mut output: Vec<Token<'src>> = Vec::with_capacity(pairs.len() + 8);
    let mut heredocs: SmallVec<[Heredoc<'src>; 2]> = SmallVec::new();
    let mut stream = StreamState::Default;

    for (i, (upstream_token, raw_state)) in pairs.iter().enumerate() {
        let event = upstream_token.kind.event()?;
        let (lineno, column) = index.locate(upstream_token.start);
        let value = &source[upstream_token.start..upstream_token.end];
        let state = resolve_state(pairs, i, event, *raw_state);
        let token = Token::new(lineno, column, event, Cow::Borrowed(value), state);

        stream = match stream {
            StreamState::Default => match event {
                Event::HeredocBeg => {
                    output.push(token);
                    heredocs.push(Heredoc::build(value));
                    StreamState::HeredocOpened
                }
                _ => {
                    output.push(token);
                    StreamState::Default
                }
            },
            StreamState::HeredocOpened => {
                let next = if event == Event::HeredocEnd {
                    StreamState::HeredocClosed
                } else {
                    StreamState::HeredocOpened
                };
                match heredocs.last_mut() {
                    Some(heredoc) => heredoc.push(token),
                    None => output.push(token),
                }
                next
            }
            StreamState::HeredocClosed => match event {
                Event::HeredocBeg => {
                    output.push(token);
                    heredocs.push(Heredoc::build(value));
                    StreamState::HeredocOpened
                }
                Event::Nl | Event::IgnoredNl | Event::Comment => {
                    output.push(token);
                    flush_heredocs(&mut heredocs, &mut output);
                    StreamState::Default
                }
                Event::TstringContent if value.ends_with(b"\n") => {
                    output.push(token);
                    flush_heredocs(&mut heredocs, &mut output);
                    StreamState::Default
                }
                _ => {
                    output.push(token);
                    StreamState::HeredocClosed
                }
            },
        };
    }

    // End of input while a heredoc is still open is tolerated: the buffered
    // bodies flush in opener order before returning.
    flush_heredocs(&mut heredocs, &mut output);

    if bom {
        apply_bom(&mut output);
    }

    // Ripper does not emit the end-of-input token in comparable form.
    output.pop();

    Ok(output)
}

/// Flushes every pending accumulator into the output, oldest opener first.
fn flush_heredocs<'src>(
    heredocs: &mut SmallVec<[Heredoc<'src>; 2]>,
    output: &mut Vec<Token<'src>>,
) {
    for heredoc in heredocs.drain(..) {
        heredoc.flush(output);
    }
}

// =============================================================================
// Fixups
// =============================================================================

/// Ripper reports `on_regexp_end` with the state it entered, not the state
/// it exits with; the upstream reports the exit state. Recover the entry
/// state from the preceding pair, walking out of interpolation if the
/// regexp body ended inside one.
fn resolve_state(pairs: &[(UpstreamToken, u32)], i: usize, event: Event, raw: u32) -> StateSet {
    if event == Event::RegexpEnd && i > 0 {
        let (prev, prev_state) = pairs[i - 1];
        if prev.kind == TokenKind::EmbexprEnd {
            let mut depth = 1i32;
            for j in (0..i - 1).rev() {
                match pairs[j].0.kind {
                    TokenKind::EmbexprEnd => depth += 1,
                    TokenKind::EmbexprBegin => {
                        depth -= 1;
                        if depth == 0 {
                            return state::from_bits(pairs[j].1);
                        }
                    }
                    _ => {}
                }
            }
        }
        return state::from_bits(prev_state);
    }
    state::from_bits(raw)
}

/// Ripper folds a leading byte-order mark into the first token's value and
/// back-dates line-1 columns by six bytes; reproduce both.
fn apply_bom(output: &mut [Token<'_>]) {
    if let Some(first) = output.first_mut() {
        let mut value = Vec::with_capacity(BOM.len() + first.value.len());
        value.extend_from_slice(BOM);
        value.extend_from_slice(&first.value);
        first.value = Cow::Owned(value);
    }
    for token in output.iter_mut().filter(|token| token.lineno == 1) {
        token.column = token.column.saturating_sub(6);
    }
}
