//! The upstream lexer contract.
//!
//! The adapter treats the modern lexer as a black box: one `lex` call over
//! the whole source, yielding `(token, state)` pairs in source order plus
//! passthrough comment and diagnostic lists. Tokens carry byte offsets into
//! the caller's source buffer; values are sliced by the driver.
//!
//! `TokenKind` is the stable external surface of the adapter. Adding a kind
//! upstream requires adding a mapping arm in [`TokenKind::event`]; kinds
//! without a Ripper counterpart (`Missing`, `NotProvided`) are rejected
//! fail-fast rather than guessed at.

use crate::error::{Comment, CompatError, Diagnostic};
use crate::token::Event;

/// Token kinds produced by the upstream lexer.
///
/// The set mirrors a full Ruby token surface. The mapping to Ripper events
/// is many-to-one: every keyword collapses to `on_kw` and every operator to
/// `on_op`, while punctuation keeps Ripper's dedicated events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TokenKind {
    // Names and literals
    Identifier,
    MethodName,
    Constant,
    InstanceVariable,
    ClassVariable,
    GlobalVariable,
    BackReference,
    NumberedReference,
    Label,
    LabelEnd,
    CharacterLiteral,
    Integer,
    IntegerImaginary,
    IntegerRational,
    IntegerRationalImaginary,
    Float,
    FloatImaginary,
    FloatRational,
    FloatRationalImaginary,

    // Strings, heredocs, regexps, symbols, word lists
    StringBegin,
    StringContent,
    StringEnd,
    HeredocStart,
    HeredocEnd,
    RegexpBegin,
    RegexpEnd,
    SymbolBegin,
    PercentLowerI,
    PercentUpperI,
    PercentLowerW,
    PercentUpperW,
    PercentLowerX,
    Backtick,
    WordsSep,

    // Embedded expressions, embedded documents, comments
    EmbexprBegin,
    EmbexprEnd,
    EmbVar,
    EmbdocBegin,
    EmbdocLine,
    EmbdocEnd,
    Comment,

    // Punctuation with dedicated Ripper events
    BraceLeft,
    BraceRight,
    BracketLeft,
    BracketLeftArray,
    BracketRight,
    ParenLeft,
    ParenRight,
    Comma,
    Semicolon,
    Dot,
    Newline,
    IgnoredNewline,
    LambdaBegin,
    MinusGreater,

    // Operators (all collapse to `on_op`)
    Amp,
    AmpAmp,
    AmpAmpEqual,
    AmpDot,
    AmpEqual,
    Bang,
    BangEqual,
    BangTilde,
    BracketLeftRight,
    BracketLeftRightEqual,
    Caret,
    CaretEqual,
    Colon,
    ColonColon,
    DotDot,
    DotDotDot,
    Equal,
    EqualEqual,
    EqualEqualEqual,
    EqualGreater,
    EqualTilde,
    Greater,
    GreaterEqual,
    GreaterGreater,
    GreaterGreaterEqual,
    Less,
    LessEqual,
    LessEqualGreater,
    LessLess,
    LessLessEqual,
    Minus,
    MinusEqual,
    Percent,
    PercentEqual,
    Pipe,
    PipeEqual,
    PipePipe,
    PipePipeEqual,
    Plus,
    PlusEqual,
    Question,
    Slash,
    SlashEqual,
    Star,
    StarEqual,
    StarStar,
    StarStarEqual,
    Tilde,
    UAmp,
    UColonColon,
    UDotDot,
    UDotDotDot,
    UMinus,
    UMinusNum,
    UPlus,
    UStar,
    UStarStar,

    // Keywords (all collapse to `on_kw`)
    KeywordAlias,
    KeywordAnd,
    KeywordBegin,
    KeywordBeginUpcase,
    KeywordBreak,
    KeywordCase,
    KeywordClass,
    KeywordDef,
    KeywordDefined,
    KeywordDo,
    KeywordElse,
    KeywordElsif,
    KeywordEnd,
    KeywordEndUpcase,
    KeywordEnsure,
    KeywordFalse,
    KeywordFor,
    KeywordIf,
    KeywordIn,
    KeywordModule,
    KeywordNext,
    KeywordNil,
    KeywordNot,
    KeywordOr,
    KeywordRedo,
    KeywordRescue,
    KeywordRetry,
    KeywordReturn,
    KeywordSelf,
    KeywordSuper,
    KeywordThen,
    KeywordTrue,
    KeywordUndef,
    KeywordUnless,
    KeywordUntil,
    KeywordWhen,
    KeywordWhile,
    KeywordYield,
    KeywordFile,
    KeywordLine,
    KeywordEncoding,

    /// `__END__` — everything after it is data, carried in the token value.
    EndMarker,
    /// End of input. Mapped, then stripped from the comparable stream.
    Eof,

    /// Placeholder emitted by error recovery; has no Ripper counterpart.
    Missing,
    /// Unset slot in upstream structures; has no Ripper counterpart.
    NotProvided,
}

impl TokenKind {
    /// Translates this kind to its Ripper event.
    ///
    /// Total over the comparable surface; `Missing` and `NotProvided` never
    /// belong in a comparable stream and abort the transform.
    pub fn event(self) -> Result<Event, CompatError> {
        use TokenKind as K;
        Ok(match self {
            K::Identifier | K::MethodName => Event::Ident,
            K::Constant => Event::Const,
            K::InstanceVariable => Event::Ivar,
            K::ClassVariable => Event::Cvar,
            K::GlobalVariable => Event::Gvar,
            K::BackReference | K::NumberedReference => Event::Backref,
            K::Label => Event::Label,
            K::LabelEnd => Event::LabelEnd,
            K::CharacterLiteral => Event::Char,
            K::Integer => Event::Int,
            K::Float => Event::Float,
            K::IntegerRational | K::FloatRational => Event::Rational,
            K::IntegerImaginary
            | K::IntegerRationalImaginary
            | K::FloatImaginary
            | K::FloatRationalImaginary => Event::Imaginary,

            K::StringBegin => Event::TstringBeg,
            K::StringContent => Event::TstringContent,
            K::StringEnd => Event::TstringEnd,
            K::HeredocStart => Event::HeredocBeg,
            K::HeredocEnd => Event::HeredocEnd,
            K::RegexpBegin => Event::RegexpBeg,
            K::RegexpEnd => Event::RegexpEnd,
            K::SymbolBegin => Event::Symbeg,
            K::PercentLowerI => Event::QsymbolsBeg,
            K::PercentUpperI => Event::SymbolsBeg,
            K::PercentLowerW => Event::QwordsBeg,
            K::PercentUpperW => Event::WordsBeg,
            K::PercentLowerX | K::Backtick => Event::Backtick,
            K::WordsSep => Event::WordsSep,

            K::EmbexprBegin => Event::EmbexprBeg,
            K::EmbexprEnd => Event::EmbexprEnd,
            K::EmbVar => Event::Embvar,
            K::EmbdocBegin => Event::EmbdocBeg,
            K::EmbdocLine => Event::Embdoc,
            K::EmbdocEnd => Event::EmbdocEnd,
            K::Comment => Event::Comment,

            K::BraceLeft => Event::Lbrace,
            K::BraceRight => Event::Rbrace,
            K::BracketLeft | K::BracketLeftArray => Event::Lbracket,
            K::BracketRight => Event::Rbracket,
            K::ParenLeft => Event::Lparen,
            K::ParenRight => Event::Rparen,
            K::Comma => Event::Comma,
            K::Semicolon => Event::Semicolon,
            K::Dot => Event::Period,
            K::Newline => Event::Nl,
            K::IgnoredNewline => Event::IgnoredNl,
            K::LambdaBegin => Event::Tlambeg,
            K::MinusGreater => Event::Tlambda,

            K::Amp
            | K::AmpAmp
            | K::AmpAmpEqual
            | K::AmpDot
            | K::AmpEqual
            | K::Bang
            | K::BangEqual
            | K::BangTilde
            | K::BracketLeftRight
            | K::BracketLeftRightEqual
            | K::Caret
            | K::CaretEqual
            | K::Colon
            | K::ColonColon
            | K::DotDot
            | K::DotDotDot
            | K::Equal
            | K::EqualEqual
            | K::EqualEqualEqual
            | K::EqualGreater
            | K::EqualTilde
            | K::Greater
            | K::GreaterEqual
            | K::GreaterGreater
            | K::GreaterGreaterEqual
            | K::Less
            | K::LessEqual
            | K::LessEqualGreater
            | K::LessLess
            | K::LessLessEqual
            | K::Minus
            | K::MinusEqual
            | K::Percent
            | K::PercentEqual
            | K::Pipe
            | K::PipeEqual
            | K::PipePipe
            | K::PipePipeEqual
            | K::Plus
            | K::PlusEqual
            | K::Question
            | K::Slash
            | K::SlashEqual
            | K::Star
            | K::StarEqual
            | K::StarStar
            | K::StarStarEqual
            | K::Tilde
            | K::UAmp
            | K::UColonColon
            | K::UDotDot
            | K::UDotDotDot
            | K::UMinus
            | K::UMinusNum
            | K::UPlus
            | K::UStar
            | K::UStarStar => Event::Op,

            K::KeywordAlias
            | K::KeywordAnd
            | K::KeywordBegin
            | K::KeywordBeginUpcase
            | K::KeywordBreak
            | K::KeywordCase
            | K::KeywordClass
            | K::KeywordDef
            | K::KeywordDefined
            | K::KeywordDo
            | K::KeywordElse
            | K::KeywordElsif
            | K::KeywordEnd
            | K::KeywordEndUpcase
            | K::KeywordEnsure
            | K::KeywordFalse
            | K::KeywordFor
            | K::KeywordIf
            | K::KeywordIn
            | K::KeywordModule
            | K::KeywordNext
            | K::KeywordNil
            | K::KeywordNot
            | K::KeywordOr
            | K::KeywordRedo
            | K::KeywordRescue
            | K::KeywordRetry
            | K::KeywordReturn
            | K::KeywordSelf
            | K::KeywordSuper
            | K::KeywordThen
            | K::KeywordTrue
            | K::KeywordUndef
            | K::KeywordUnless
            | K::KeywordUntil
            | K::KeywordWhen
            | K::KeywordWhile
            | K::KeywordYield
            | K::KeywordFile
            | K::KeywordLine
            | K::KeywordEncoding => Event::Kw,

            K::EndMarker => Event::EndMarker,
            K::Eof => Event::Eof,

            K::Missing | K::NotProvided => return Err(CompatError::UnmappedKind(self)),
        })
    }
}

/// One upstream token: a kind plus the byte range of its source slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamToken {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl UpstreamToken {
    #[inline]
    pub const fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

/// Everything one upstream `lex` call yields. The `tokens` states are raw
/// integers suitable for wrapping in [`crate::state::StateSet`].
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<(UpstreamToken, u32)>,
    pub comments: Vec<Comment>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// The black-box upstream lexer dependency.
pub trait UpstreamLexer {
    fn lex(&self, source: &[u8]) -> Lexed;
}
