//! Ripper lexer-state bitset.
//!
//! Ripper reports each token with the C lexer's `EXPR_*` state bits. The
//! bit assignment below matches the reference enum, so a raw state integer
//! from the upstream lexer can be wrapped without translation.

use enumset::{enum_set, EnumSet, EnumSetType};

/// One bit of the reference lexer state. Declaration order fixes the bit
/// positions: `Beg` is bit 0, `Fitem` is bit 12.
#[derive(EnumSetType, Debug)]
pub enum LexState {
    Beg,
    End,
    Endarg,
    Endfn,
    Arg,
    Cmdarg,
    Mid,
    Fname,
    Dot,
    Class,
    Label,
    Labeled,
    Fitem,
}

pub type StateSet = EnumSet<LexState>;

pub const EXPR_NONE: StateSet = enum_set!();
pub const EXPR_BEG: StateSet = enum_set!(LexState::Beg);
pub const EXPR_END: StateSet = enum_set!(LexState::End);
pub const EXPR_ENDARG: StateSet = enum_set!(LexState::Endarg);
pub const EXPR_ENDFN: StateSet = enum_set!(LexState::Endfn);
pub const EXPR_ARG: StateSet = enum_set!(LexState::Arg);
pub const EXPR_CMDARG: StateSet = enum_set!(LexState::Cmdarg);
pub const EXPR_MID: StateSet = enum_set!(LexState::Mid);
pub const EXPR_FNAME: StateSet = enum_set!(LexState::Fname);
pub const EXPR_DOT: StateSet = enum_set!(LexState::Dot);
pub const EXPR_CLASS: StateSet = enum_set!(LexState::Class);
pub const EXPR_LABEL: StateSet = enum_set!(LexState::Label);
pub const EXPR_LABELED: StateSet = enum_set!(LexState::Labeled);
pub const EXPR_FITEM: StateSet = enum_set!(LexState::Fitem);

/// The argument-position family.
pub const EXPR_ARG_ANY: StateSet = enum_set!(LexState::Arg | LexState::Cmdarg);

/// Wraps a raw upstream state integer. Bits outside the reference enum are
/// dropped rather than rejected; the upstream may track private state there.
#[inline]
pub fn from_bits(bits: u32) -> StateSet {
    EnumSet::from_u32_truncated(bits)
}

/// Renders a state set the way Ripper's `Lexer::State#to_s` does, e.g.
/// `EXPR_END|EXPR_LABEL`. Used by `Token`'s tuple-style `Debug`.
pub fn describe(set: StateSet) -> String {
    if set.is_empty() {
        return "EXPR_NONE".to_string();
    }
    let mut out = String::new();
    for bit in set.iter() {
        if !out.is_empty() {
            out.push('|');
        }
        out.push_str(match bit {
            LexState::Beg => "EXPR_BEG",
            LexState::End => "EXPR_END",
            LexState::Endarg => "EXPR_ENDARG",
            LexState::Endfn => "EXPR_ENDFN",
            LexState::Arg => "EXPR_ARG",
            LexState::Cmdarg => "EXPR_CMDARG",
            LexState::Mid => "EXPR_MID",
            LexState::Fname => "EXPR_FNAME",
            LexState::Dot => "EXPR_DOT",
            LexState::Class => "EXPR_CLASS",
            LexState::Label => "EXPR_LABEL",
            LexState::Labeled => "EXPR_LABELED",
            LexState::Fitem => "EXPR_FITEM",
        });
    }
    out
}
