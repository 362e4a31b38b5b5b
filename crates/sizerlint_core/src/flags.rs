//! Sizer flag symbol table and flag-string parser.
//!
//! # Responsibility
//! - Map wxWidgets sizer flag names to bit values.
//! - Decode pipe-delimited flag strings into one combined mask.
//!
//! # Invariants
//! - Every flag name owns a distinct bit, so set membership stays exact
//!   even for names wxWidgets itself aliases (`wxEXPAND` vs `wxGROW`).
//! - The table is populated once and never mutated afterwards.
//! - Lookup is spelling-exact; no fuzzy matching.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Bit values for the known sizer flags.
///
/// These are local to this checker, not wxWidgets ABI values. Keeping one
/// bit per name lets the sizer allow-set include `wxGROW` while excluding
/// `wxEXPAND` and `wxALL`, which wx collapses into other bits.
pub mod bits {
    pub const CENTRE: u32 = 1 << 0;
    pub const HORIZONTAL: u32 = 1 << 1;
    pub const VERTICAL: u32 = 1 << 2;
    pub const LEFT: u32 = 1 << 3;
    pub const RIGHT: u32 = 1 << 4;
    pub const UP: u32 = 1 << 5;
    pub const DOWN: u32 = 1 << 6;
    pub const ALIGN_NOT: u32 = 1 << 7;
    pub const ALIGN_CENTER_HORIZONTAL: u32 = 1 << 8;
    pub const ALIGN_RIGHT: u32 = 1 << 9;
    pub const ALIGN_BOTTOM: u32 = 1 << 10;
    pub const ALIGN_CENTER_VERTICAL: u32 = 1 << 11;
    pub const FIXED_MINSIZE: u32 = 1 << 12;
    pub const RESERVE_SPACE_EVEN_IF_HIDDEN: u32 = 1 << 13;
    pub const STRETCH_NOT: u32 = 1 << 14;
    pub const SHRINK: u32 = 1 << 15;
    pub const GROW: u32 = 1 << 16;
    pub const SHAPED: u32 = 1 << 17;
    pub const EXPAND: u32 = 1 << 18;
    pub const ALL: u32 = 1 << 19;
}

static FLAG_TABLE: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("wxCENTRE", bits::CENTRE),
        ("wxHORIZONTAL", bits::HORIZONTAL),
        ("wxVERTICAL", bits::VERTICAL),
        ("wxLEFT", bits::LEFT),
        ("wxRIGHT", bits::RIGHT),
        ("wxUP", bits::UP),
        ("wxDOWN", bits::DOWN),
        ("wxALIGN_NOT", bits::ALIGN_NOT),
        ("wxALIGN_CENTER_HORIZONTAL", bits::ALIGN_CENTER_HORIZONTAL),
        ("wxALIGN_RIGHT", bits::ALIGN_RIGHT),
        ("wxALIGN_BOTTOM", bits::ALIGN_BOTTOM),
        ("wxALIGN_CENTER_VERTICAL", bits::ALIGN_CENTER_VERTICAL),
        ("wxFIXED_MINSIZE", bits::FIXED_MINSIZE),
        (
            "wxRESERVE_SPACE_EVEN_IF_HIDDEN",
            bits::RESERVE_SPACE_EVEN_IF_HIDDEN,
        ),
        ("wxSTRETCH_NOT", bits::STRETCH_NOT),
        ("wxSHRINK", bits::SHRINK),
        ("wxGROW", bits::GROW),
        ("wxSHAPED", bits::SHAPED),
        ("wxEXPAND", bits::EXPAND),
        ("wxALL", bits::ALL),
    ])
});

/// Looks up the bit value for one flag name.
///
/// Absence signals an unknown flag to the caller; this never fails
/// internally.
pub fn lookup(name: &str) -> Option<u32> {
    FLAG_TABLE.get(name).copied()
}

/// Outcome of decoding one flag-string property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFlags {
    /// OR of all recognized flag bits.
    pub mask: u32,
    /// Non-empty tokens that did not resolve, in declaration order.
    pub unknown: Vec<String>,
}

/// Decodes a pipe-delimited flag string into a combined bitmask.
///
/// Tokens are trimmed; tokens empty after trimming are skipped, so an
/// empty or whitespace-only string yields mask 0 with no unknowns.
/// Unknown tokens are collected and decoding continues, so the mask still
/// carries every recognized bit.
pub fn parse(raw: &str) -> ParsedFlags {
    let mut parsed = ParsedFlags::default();
    for token in raw.split('|') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match lookup(token) {
            Some(bit) => parsed.mask |= bit,
            None => parsed.unknown.push(token.to_string()),
        }
    }
    parsed
}
