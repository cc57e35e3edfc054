// fuzz_targets/heredoc.rs
#![no_main]

use libfuzzer_sys::fuzz_target;
use ruby_lex_compat::state::EXPR_BEG;
use ruby_lex_compat::{compat_tokens, Event, TokenKind, UpstreamToken};

// Arbitrary bytes become a dedenting heredoc body; the rewriter must never
// panic, must conserve body bytes, and must keep the stream tiling the
// source in order.
fuzz_target!(|data: &[u8]| {
    let mut source = Vec::with_capacity(data.len() + 16);
    source.extend_from_slice(b"<<~FZ\n");
    let body_start = source.len();
    source.extend_from_slice(data);
    let body_end = source.len();
    source.extend_from_slice(b"FZ\n");
    let eof = source.len();

    let state = EXPR_BEG.as_u32();
    let mut pairs = vec![(UpstreamToken::new(TokenKind::HeredocStart, 0, 5), state)];
    if body_start < body_end {
        pairs.push((
            UpstreamToken::new(TokenKind::StringContent, body_start, body_end),
            state,
        ));
    }
    pairs.push((
        UpstreamToken::new(TokenKind::HeredocEnd, body_end, eof),
        state,
    ));
    pairs.push((UpstreamToken::new(TokenKind::Newline, 5, 6), state));
    pairs.push((UpstreamToken::new(TokenKind::Eof, eof, eof), state));

    let tokens = compat_tokens(&source, &pairs).unwrap();

    let mut rebuilt = Vec::with_capacity(source.len());
    let mut body_bytes = 0usize;
    for token in &tokens {
        rebuilt.extend_from_slice(&token.value);
        if matches!(token.event, Event::IgnoredSp | Event::TstringContent) {
            body_bytes += token.value.len();
        }
        assert!(token.lineno >= 1);
    }

    assert_eq!(rebuilt, source);
    assert_eq!(body_bytes, data.len());
});
