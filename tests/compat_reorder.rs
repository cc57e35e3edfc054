// tests/compat_reorder.rs
//
// Stream-level behavior: heredoc bodies re-emitted after the opener's line,
// flush triggers, end-of-input handling, BOM and regexp-end fixups.

use ruby_lex_compat::error::{Comment, CompatError, Diagnostic, Span};
use ruby_lex_compat::state::{EXPR_ARG, EXPR_BEG, EXPR_END, EXPR_LABEL};
use ruby_lex_compat::{
    compat_tokens, lex_compat, Event, Lexed, Token, TokenKind, UpstreamLexer, UpstreamToken,
};

fn pair(kind: TokenKind, start: usize, end: usize, state: u32) -> (UpstreamToken, u32) {
    (UpstreamToken::new(kind, start, end), state)
}

fn beg(kind: TokenKind, start: usize, end: usize) -> (UpstreamToken, u32) {
    pair(kind, start, end, EXPR_BEG.as_u32())
}

fn events(tokens: &[Token<'_>]) -> Vec<Event> {
    tokens.iter().map(|t| t.event).collect()
}

fn values<'a>(tokens: &'a [Token<'_>]) -> Vec<&'a [u8]> {
    tokens.iter().map(|t| &t.value[..]).collect()
}

fn locations(tokens: &[Token<'_>]) -> Vec<(usize, usize)> {
    tokens.iter().map(|t| (t.lineno, t.column)).collect()
}

#[test]
fn plain_heredoc_body_moves_after_opener_line() {
    let source = b"<<FOO\nhi\nFOO\n";
    let pairs = vec![
        beg(TokenKind::HeredocStart, 0, 5),
        beg(TokenKind::StringContent, 6, 9),
        beg(TokenKind::HeredocEnd, 9, 13),
        beg(TokenKind::Newline, 5, 6),
        beg(TokenKind::Eof, 13, 13),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    assert_eq!(
        events(&tokens),
        vec![
            Event::HeredocBeg,
            Event::Nl,
            Event::TstringContent,
            Event::HeredocEnd,
        ],
        "tokens={tokens:?}"
    );
    assert_eq!(
        values(&tokens),
        vec![&b"<<FOO"[..], b"\n", b"hi\n", b"FOO\n"],
        "tokens={tokens:?}"
    );
    assert_eq!(locations(&tokens), vec![(1, 0), (1, 5), (2, 0), (3, 0)]);
}

#[test]
fn sibling_heredocs_flush_in_opener_order() {
    let source = b"<<A; <<B\na-body\nA\nb-body\nB\n";
    let pairs = vec![
        beg(TokenKind::HeredocStart, 0, 3),
        beg(TokenKind::StringContent, 9, 16),
        beg(TokenKind::HeredocEnd, 16, 18),
        beg(TokenKind::Semicolon, 3, 4),
        beg(TokenKind::HeredocStart, 5, 8),
        beg(TokenKind::StringContent, 18, 25),
        beg(TokenKind::HeredocEnd, 25, 27),
        beg(TokenKind::Newline, 8, 9),
        beg(TokenKind::Eof, 27, 27),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    assert_eq!(
        values(&tokens),
        vec![
            &b"<<A"[..],
            b";",
            b"<<B",
            b"\n",
            b"a-body\n",
            b"A\n",
            b"b-body\n",
            b"B\n",
        ],
        "tokens={tokens:?}"
    );
    assert_eq!(
        locations(&tokens),
        vec![
            (1, 0),
            (1, 3),
            (1, 5),
            (1, 8),
            (2, 0),
            (3, 0),
            (4, 0),
            (5, 0),
        ]
    );
}

#[test]
fn comment_on_opener_line_triggers_flush() {
    // Ripper's comment token swallows the trailing newline, so the comment
    // itself ends the opener's line.
    let source = b"<<FOO # c\nhi\nFOO\n";
    let pairs = vec![
        beg(TokenKind::HeredocStart, 0, 5),
        beg(TokenKind::StringContent, 10, 13),
        beg(TokenKind::HeredocEnd, 13, 17),
        beg(TokenKind::Comment, 6, 10),
        beg(TokenKind::Eof, 17, 17),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    assert_eq!(
        events(&tokens),
        vec![
            Event::HeredocBeg,
            Event::Comment,
            Event::TstringContent,
            Event::HeredocEnd,
        ],
        "tokens={tokens:?}"
    );
}

#[test]
fn ignored_newline_triggers_flush() {
    let source = b"<<FOO +\nhi\nFOO\n";
    let pairs = vec![
        beg(TokenKind::HeredocStart, 0, 5),
        beg(TokenKind::StringContent, 8, 11),
        beg(TokenKind::HeredocEnd, 11, 15),
        beg(TokenKind::Plus, 6, 7),
        beg(TokenKind::IgnoredNewline, 7, 8),
        beg(TokenKind::Eof, 15, 15),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    assert_eq!(
        events(&tokens),
        vec![
            Event::HeredocBeg,
            Event::Op,
            Event::IgnoredNl,
            Event::TstringContent,
            Event::HeredocEnd,
        ],
        "tokens={tokens:?}"
    );
}

#[test]
fn string_content_ending_in_newline_triggers_flush() {
    // A heredoc opened inside interpolation: the enclosing string's content
    // token carries the line's trailing newline and releases the body.
    let source = b"\"#{<<A}x\nbody\nA\n";
    let pairs = vec![
        beg(TokenKind::StringBegin, 0, 1),
        beg(TokenKind::EmbexprBegin, 1, 3),
        beg(TokenKind::HeredocStart, 3, 6),
        beg(TokenKind::StringContent, 9, 14),
        beg(TokenKind::HeredocEnd, 14, 16),
        beg(TokenKind::EmbexprEnd, 6, 7),
        beg(TokenKind::StringContent, 7, 9),
        beg(TokenKind::Eof, 16, 16),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    assert_eq!(
        values(&tokens),
        vec![
            &b"\""[..],
            b"#{",
            b"<<A",
            b"}",
            b"x\n",
            b"body\n",
            b"A\n",
        ],
        "tokens={tokens:?}"
    );
}

#[test]
fn end_of_input_forces_flush_of_open_heredoc() {
    // The closer never arrives; buffered tokens must not be lost.
    let source = b"<<FOO\nhi";
    let pairs = vec![
        beg(TokenKind::HeredocStart, 0, 5),
        beg(TokenKind::StringContent, 6, 8),
        beg(TokenKind::Newline, 5, 6),
        beg(TokenKind::Eof, 8, 8),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    assert_eq!(
        events(&tokens),
        vec![Event::HeredocBeg, Event::TstringContent, Event::Nl],
        "tokens={tokens:?}"
    );
}

#[test]
fn final_token_is_stripped() {
    let source = b"x\n";
    let pairs = vec![
        beg(TokenKind::Identifier, 0, 1),
        beg(TokenKind::Newline, 1, 2),
        beg(TokenKind::Eof, 2, 2),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    assert_eq!(events(&tokens), vec![Event::Ident, Event::Nl]);
}

#[test]
fn empty_source_yields_empty_stream() {
    let tokens = compat_tokens(b"", &[beg(TokenKind::Eof, 0, 0)]).unwrap();
    assert!(tokens.is_empty(), "tokens={tokens:?}");
}

#[test]
fn unmapped_kind_aborts_with_the_offending_kind() {
    let pairs = vec![beg(TokenKind::Missing, 0, 0)];
    let err = compat_tokens(b"", &pairs).unwrap_err();
    assert_eq!(err, CompatError::UnmappedKind(TokenKind::Missing));
}

#[test]
fn keywords_and_operators_collapse() {
    let source = b"def f; 1 <=> 2; end\n";
    let pairs = vec![
        beg(TokenKind::KeywordDef, 0, 3),
        beg(TokenKind::Identifier, 4, 5),
        beg(TokenKind::Semicolon, 5, 6),
        beg(TokenKind::Integer, 7, 8),
        beg(TokenKind::LessEqualGreater, 9, 12),
        beg(TokenKind::Integer, 13, 14),
        beg(TokenKind::Semicolon, 14, 15),
        beg(TokenKind::KeywordEnd, 16, 19),
        beg(TokenKind::Newline, 19, 20),
        beg(TokenKind::Eof, 20, 20),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    assert_eq!(
        events(&tokens),
        vec![
            Event::Kw,
            Event::Ident,
            Event::Semicolon,
            Event::Int,
            Event::Op,
            Event::Int,
            Event::Semicolon,
            Event::Kw,
            Event::Nl,
        ]
    );
}

// =============================================================================
// Entry point
// =============================================================================

/// A scripted stand-in for the real upstream lexer.
struct ScriptedUpstream(Lexed);

impl UpstreamLexer for ScriptedUpstream {
    fn lex(&self, _source: &[u8]) -> Lexed {
        self.0.clone()
    }
}

#[test]
fn lex_compat_forwards_comments_and_diagnostics_verbatim() {
    let source = b"x # c\n";
    let upstream = ScriptedUpstream(Lexed {
        tokens: vec![
            beg(TokenKind::Identifier, 0, 1),
            beg(TokenKind::Comment, 2, 6),
            beg(TokenKind::Eof, 6, 6),
        ],
        comments: vec![Comment {
            span: Span::from_range(2..6),
        }],
        errors: vec![Diagnostic {
            span: Span::new(0, 1),
            message: "scripted error".to_string(),
        }],
        warnings: vec![Diagnostic {
            span: Span::new(2, 6),
            message: "scripted warning".to_string(),
        }],
    });

    let result = lex_compat(source, &upstream).unwrap();
    assert_eq!(events(&result.tokens), vec![Event::Ident, Event::Comment]);
    assert_eq!(result.comments, upstream.0.comments);
    assert_eq!(result.errors, upstream.0.errors);
    assert_eq!(result.warnings, upstream.0.warnings);
}

// =============================================================================
// BOM fixup
// =============================================================================

#[test]
fn bom_is_prepended_to_first_token_and_line_one_columns_shift() {
    let source = b"\xEF\xBB\xBFfoo.bar = 10\nx\n";
    let pairs = vec![
        beg(TokenKind::Identifier, 3, 6),
        beg(TokenKind::Dot, 6, 7),
        beg(TokenKind::Identifier, 7, 10),
        beg(TokenKind::Equal, 11, 12),
        beg(TokenKind::Integer, 13, 15),
        beg(TokenKind::Newline, 15, 16),
        beg(TokenKind::Identifier, 16, 17),
        beg(TokenKind::Newline, 17, 18),
        beg(TokenKind::Eof, 18, 18),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    assert_eq!(&tokens[0].value[..], b"\xEF\xBB\xBFfoo", "tokens={tokens:?}");
    assert_eq!(
        locations(&tokens),
        vec![
            (1, 0),
            (1, 0),
            (1, 1),
            (1, 5),
            (1, 7),
            (1, 9),
            (2, 0),
            (2, 1),
        ],
        "line-2 columns must not shift"
    );
}

#[test]
fn bom_only_source_strips_down_to_nothing() {
    // The single upstream token is the end-of-input marker; it receives the
    // BOM bytes, then the final strip removes it.
    let source = b"\xEF\xBB\xBF";
    let pairs = vec![beg(TokenKind::Eof, 3, 3)];
    let tokens = compat_tokens(source, &pairs).unwrap();
    assert!(tokens.is_empty(), "tokens={tokens:?}");
}

// =============================================================================
// Regexp-end state backfill
// =============================================================================

#[test]
fn regexp_end_takes_the_preceding_token_state() {
    let source = b"/ab/\n";
    let pairs = vec![
        beg(TokenKind::RegexpBegin, 0, 1),
        pair(TokenKind::StringContent, 1, 3, (EXPR_BEG | EXPR_LABEL).as_u32()),
        pair(TokenKind::RegexpEnd, 3, 4, EXPR_END.as_u32()),
        beg(TokenKind::Newline, 4, 5),
        beg(TokenKind::Eof, 5, 5),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    let regexp_end = &tokens[2];
    assert_eq!(regexp_end.event, Event::RegexpEnd);
    assert_eq!(regexp_end.state, EXPR_BEG | EXPR_LABEL, "tokens={tokens:?}");
}

#[test]
fn regexp_end_after_interpolation_takes_the_embexpr_beg_state() {
    let source = b"/a#{b}/\n";
    let pairs = vec![
        beg(TokenKind::RegexpBegin, 0, 1),
        beg(TokenKind::StringContent, 1, 2),
        pair(TokenKind::EmbexprBegin, 2, 4, (EXPR_BEG | EXPR_LABEL).as_u32()),
        pair(TokenKind::Identifier, 4, 5, (EXPR_END | EXPR_ARG).as_u32()),
        pair(TokenKind::EmbexprEnd, 5, 6, EXPR_END.as_u32()),
        pair(TokenKind::RegexpEnd, 6, 7, EXPR_END.as_u32()),
        beg(TokenKind::Newline, 7, 8),
        beg(TokenKind::Eof, 8, 8),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    let regexp_end = tokens.iter().find(|t| t.event == Event::RegexpEnd).unwrap();
    assert_eq!(regexp_end.state, EXPR_BEG | EXPR_LABEL, "tokens={tokens:?}");
}

#[test]
fn regexp_end_walks_out_of_nested_interpolation() {
    let source = b"/a#{\"#{c}\"}/\n";
    let pairs = vec![
        beg(TokenKind::RegexpBegin, 0, 1),
        beg(TokenKind::StringContent, 1, 2),
        pair(TokenKind::EmbexprBegin, 2, 4, (EXPR_BEG | EXPR_LABEL).as_u32()),
        beg(TokenKind::StringBegin, 4, 5),
        pair(TokenKind::EmbexprBegin, 5, 7, EXPR_BEG.as_u32()),
        pair(TokenKind::Identifier, 7, 8, EXPR_END.as_u32()),
        pair(TokenKind::EmbexprEnd, 8, 9, EXPR_END.as_u32()),
        beg(TokenKind::StringEnd, 9, 10),
        pair(TokenKind::EmbexprEnd, 10, 11, EXPR_END.as_u32()),
        pair(TokenKind::RegexpEnd, 11, 12, EXPR_END.as_u32()),
        beg(TokenKind::Newline, 12, 13),
        beg(TokenKind::Eof, 13, 13),
    ];

    let tokens = compat_tokens(source, &pairs).unwrap();
    let regexp_end = tokens.iter().find(|t| t.event == Event::RegexpEnd).unwrap();
    // The outermost interpolation's entry state, not the nested one's.
    assert_eq!(regexp_end.state, EXPR_BEG | EXPR_LABEL, "tokens={tokens:?}");
}
