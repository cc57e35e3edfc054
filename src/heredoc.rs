//! Heredoc body buffering and rewriting.
//!
//! The upstream lexer emits heredoc bodies immediately after the opener;
//! Ripper emits them in source order, after the line that contains the
//! opener. While the stream driver holds body tokens back, the accumulator
//! chosen by the opener shape decides what happens to them on flush:
//!
//! - `<<ID`  — plain: bodies pass through untouched.
//! - `<<-ID` — dash: interpolating bodies are split at backslash-newline.
//! - `<<~ID` — dedenting: the common leading whitespace (tab stops of 8) is
//!   computed across body lines and re-emitted as `on_ignored_sp` tokens,
//!   which Ripper produces and the upstream lexer does not.
//!
//! Content inside embedded expressions is never split or dedent-analyzed.

use std::borrow::Cow;

use memchr::{memchr_iter, memmem};

use crate::token::{Event, Token};

pub(crate) const TAB_WIDTH: usize = 8;

// =============================================================================
// Shared helpers
// =============================================================================

/// Brace balance for embedded expressions. Every walk owns its own counter;
/// the append and flush phases must not share one.
#[derive(Debug, Default, Clone, Copy)]
struct EmbexprBalance(i32);

impl EmbexprBalance {
    #[inline]
    fn observe(&mut self, event: Event) {
        match event {
            Event::EmbexprBeg => self.0 += 1,
            Event::EmbexprEnd => self.0 -= 1,
            _ => {}
        }
    }

    #[inline]
    fn at_top(self) -> bool {
        self.0 == 0
    }
}

/// Whitespace that participates in dedent computation. Mirrors the
/// reference's `\s` class minus the newline, which terminates lines instead.
#[inline]
fn is_dedent_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\x0B' | b'\x0C')
}

/// One tab-stop step: tabs jump to the next multiple of [`TAB_WIDTH`],
/// everything else advances one column.
#[inline]
fn advance_width(width: usize, byte: u8) -> usize {
    if byte == b'\t' {
        width - width % TAB_WIDTH + TAB_WIDTH
    } else {
        width + 1
    }
}

/// Splits `value` after every newline, keeping the newline on the preceding
/// segment. Returned as index ranges so callers can re-slice the source.
fn line_ranges(value: &[u8]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for pos in memchr_iter(b'\n', value) {
        ranges.push((start, pos + 1));
        start = pos + 1;
    }
    if start < value.len() {
        ranges.push((start, value.len()));
    }
    ranges
}

/// Splits `value` after every backslash-newline pair, keeping the pair on
/// the preceding segment.
fn escaped_line_ranges(value: &[u8]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for pos in memmem::find_iter(value, b"\\\n") {
        ranges.push((start, pos + 2));
        start = pos + 2;
    }
    if start < value.len() {
        ranges.push((start, value.len()));
    }
    ranges
}

/// Re-slices a token value without giving up a borrowed backing buffer.
fn subvalue<'src>(value: &Cow<'src, [u8]>, start: usize, end: usize) -> Cow<'src, [u8]> {
    match value {
        Cow::Borrowed(bytes) => Cow::Borrowed(&bytes[start..end]),
        Cow::Owned(bytes) => Cow::Owned(bytes[start..end].to_vec()),
    }
}

// =============================================================================
// Accumulators
// =============================================================================

/// A heredoc being buffered between its opener and the flush point.
#[derive(Debug)]
pub(crate) enum Heredoc<'src> {
    Plain {
        tokens: Vec<Token<'src>>,
    },
    Dash {
        tokens: Vec<Token<'src>>,
        /// Interpolating dash heredocs split content at backslash-newline;
        /// single-quoted ones keep it literal.
        split: bool,
    },
    Dedenting {
        tokens: Vec<Token<'src>>,
        /// Minimum common leading whitespace seen so far, in tab-expanded
        /// columns. `None` until the first non-blank body line.
        dedent: Option<usize>,
        /// Whether the next string content token starts a fresh line.
        dedent_next: bool,
        balance: EmbexprBalance,
    },
}

impl<'src> Heredoc<'src> {
    /// Selects the accumulator from the opener's textual shape: the third
    /// byte of `<<~ID` / `<<-ID` / `<<ID` disambiguates.
    pub(crate) fn build(opener_value: &[u8]) -> Self {
        match opener_value.get(2) {
            Some(b'~') => Heredoc::Dedenting {
                tokens: Vec::new(),
                dedent: None,
                dedent_next: true,
                balance: EmbexprBalance::default(),
            },
            Some(b'-') => Heredoc::Dash {
                tokens: Vec::new(),
                split: opener_value.get(3) != Some(&b'\''),
            },
            _ => Heredoc::Plain { tokens: Vec::new() },
        }
    }

    pub(crate) fn push(&mut self, token: Token<'src>) {
        match self {
            Heredoc::Plain { tokens } | Heredoc::Dash { tokens, .. } => tokens.push(token),
            Heredoc::Dedenting {
                tokens,
                dedent,
                dedent_next,
                balance,
            } => {
                balance.observe(token.event);
                if token.event == Event::TstringContent && balance.at_top() {
                    // Newlines are discarded for the dedent computation;
                    // only lines that start fresh participate.
                    for (index, line) in token.value.split(|&b| b == b'\n').enumerate() {
                        if (index == 0 && !*dedent_next) || line.is_empty() {
                            continue;
                        }
                        let mut width = 0;
                        for &byte in line {
                            if !is_dedent_space(byte) {
                                break;
                            }
                            width = advance_width(width, byte);
                        }
                        *dedent = Some(dedent.map_or(width, |d| d.min(width)));
                    }
                }
                *dedent_next = token.event == Event::TstringContent && balance.at_top();
                tokens.push(token);
            }
        }
    }

    /// Rewrites the buffered body into `out`.
    pub(crate) fn flush(self, out: &mut Vec<Token<'src>>) {
        match self {
            Heredoc::Plain { tokens } => out.extend(tokens),
            Heredoc::Dash { tokens, split } => flush_dash(tokens, split, out),
            Heredoc::Dedenting { tokens, dedent, .. } => match dedent {
                None => flush_blank(tokens, out),
                Some(dedent) => flush_dedented(tokens, dedent, out),
            },
        }
    }
}

// =============================================================================
// Flush walks
// =============================================================================

fn flush_dash<'src>(tokens: Vec<Token<'src>>, split: bool, out: &mut Vec<Token<'src>>) {
    let mut balance = EmbexprBalance::default();
    for token in tokens {
        balance.observe(token.event);
        if token.event == Event::TstringContent && balance.at_top() && split {
            let ranges = escaped_line_ranges(&token.value);
            let mut lineno = token.lineno;
            for (index, &(start, end)) in ranges.iter().enumerate() {
                let column = if index == 0 { token.column } else { 0 };
                let segment = subvalue(&token.value, start, end);
                let newlines = memchr_iter(b'\n', &segment).count();
                out.push(Token::new(
                    lineno,
                    column,
                    Event::TstringContent,
                    segment,
                    token.state,
                ));
                lineno += newlines;
            }
        } else {
            out.push(token);
        }
    }
}

/// Every body line was blank: nothing to dedent, but content still splits
/// one token per line the way the reference reports it.
fn flush_blank<'src>(tokens: Vec<Token<'src>>, out: &mut Vec<Token<'src>>) {
    let mut balance = EmbexprBalance::default();
    for token in tokens {
        balance.observe(token.event);
        if token.event == Event::TstringContent && balance.at_top() {
            for (index, &(start, end)) in line_ranges(&token.value).iter().enumerate() {
                let column = if index == 0 { token.column } else { 0 };
                out.push(Token::new(
                    token.lineno + index,
                    column,
                    Event::TstringContent,
                    subvalue(&token.value, start, end),
                    token.state,
                ));
            }
        } else {
            out.push(token);
        }
    }
}

fn flush_dedented<'src>(tokens: Vec<Token<'src>>, dedent: usize, out: &mut Vec<Token<'src>>) {
    let mut balance = EmbexprBalance::default();
    let mut dedent_next = true;
    for token in tokens {
        balance.observe(token.event);
        let is_content = token.event == Event::TstringContent && balance.at_top();
        if is_content {
            for (index, &(start, end)) in line_ranges(&token.value).iter().enumerate() {
                let lineno = token.lineno + index;
                let mut column = token.column;
                let segment = &token.value[start..end];
                let fresh = dedent_next || index > 0;

                if segment == b"\n" && fresh {
                    column = 0;
                }

                // Nothing will ever be stripped: re-join the remaining
                // segments into a single token and stop early.
                if dedent == 0
                    && (!dedent_next || !segment.first().is_some_and(|&b| is_dedent_space(b)))
                {
                    out.push(Token::new(
                        lineno,
                        column,
                        Event::TstringContent,
                        subvalue(&token.value, start, token.value.len()),
                        token.state,
                    ));
                    break;
                }

                let mut rest = start;
                if segment != b"\n" && dedent > 0 && fresh {
                    // Consume leading bytes while their tab-expanded width
                    // stays within the dedent; the cut lands before any
                    // character that would overshoot.
                    let mut deleting = 0;
                    let mut prefix = 0;
                    for &byte in segment {
                        let next = advance_width(deleting, byte);
                        if next > dedent {
                            break;
                        }
                        deleting = next;
                        prefix += 1;
                    }
                    if prefix > 0 {
                        out.push(Token::new(
                            lineno,
                            0,
                            Event::IgnoredSp,
                            subvalue(&token.value, start, start + prefix),
                            token.state,
                        ));
                    }
                    column = prefix;
                    rest = start + prefix;
                }

                if rest < end {
                    out.push(Token::new(
                        lineno,
                        column,
                        Event::TstringContent,
                        subvalue(&token.value, rest, end),
                        token.state,
                    ));
                }
            }
        } else {
            out.push(token);
        }
        dedent_next = is_content;
    }
}
