//! The ordered catalog of instruction encodings.
//!
//! [find] returns the first row that matches, so rows with a secondary condition have to come
//! before any row that would match the same first byte without one.

use crate::{BitField, MatchCondition};
use sim_instruction::{Form, Mnemonic};

/// Selects the routine that extracts fields and consumes bytes for an encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    RegMemWithRegister,
    ImmediateToRegMem,
    ImmediateToAccumulator,
    ImmediateToRegister,
    Branch,
}

impl From<Form> for Shape {
    fn from(form: Form) -> Self {
        match form {
            Form::RegMemWithRegister { .. } => Shape::RegMemWithRegister,
            Form::ImmediateToRegMem => Shape::ImmediateToRegMem,
            Form::ImmediateToAccumulator => Shape::ImmediateToAccumulator,
            Form::ImmediateToRegister => Shape::ImmediateToRegister,
            Form::Branch => Shape::Branch,
        }
    }
}

/// One row of the table.
///
/// `d`, `s`, `w` (and for the short forms `reg`) are read from the first byte; `mode`, `reg` and
/// `rm` from the second byte for shapes that carry a mod/reg/rm byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoding {
    pub mnemonic: Mnemonic,
    pub primary: MatchCondition,
    /// Checked against the second byte. [MatchCondition::ALWAYS] if there is none.
    pub secondary: MatchCondition,
    pub d: BitField,
    pub s: BitField,
    pub w: BitField,
    pub mode: BitField,
    pub reg: BitField,
    pub rm: BitField,
    pub shape: Shape,
}

impl Encoding {
    /// `second` is peeked, not consumed, and is `None` at the end of memory.
    pub fn matches(&self, first: u8, second: Option<u8>) -> bool {
        if !self.primary.matches(first) {
            return false;
        }

        self.secondary.is_always() || second.map_or(false, |byte| self.secondary.matches(byte))
    }
}

#[allow(clippy::too_many_arguments)]
const fn row(
    mnemonic: Mnemonic,
    mask: u8,
    equals: u8,
    secondary: MatchCondition,
    d: u8,
    s: u8,
    w: u8,
    mode: u8,
    reg: u8,
    rm: u8,
    shape: Shape,
) -> Encoding {
    Encoding {
        mnemonic,
        primary: MatchCondition::pattern(mask, equals),
        secondary,
        d: BitField::new(d),
        s: BitField::new(s),
        w: BitField::new(w),
        mode: BitField::new(mode),
        reg: BitField::new(reg),
        rm: BitField::new(rm),
        shape,
    }
}

const fn branch(mnemonic: Mnemonic, op_code: u8) -> Encoding {
    row(mnemonic, 0xFF, op_code, ALWAYS, 0, 0, 0, 0, 0, 0, Shape::Branch)
}

const ALWAYS: MatchCondition = MatchCondition::ALWAYS;

/// Selects the operation of the shared `100000sw` immediate group from the reg field.
const fn group(value: u8) -> MatchCondition {
    MatchCondition::field(0x38, value)
}

use Mnemonic::*;
use Shape::*;

#[rustfmt::skip]
pub static ENCODINGS: &[Encoding] = &[
    //  mnemonic mask  equals       secondary      d     s     w     mod   reg   rm    shape
    row(MOV,     0xFC, 0b1000_1000, ALWAYS,        0x02, 0x00, 0x01, 0xC0, 0x38, 0x07, RegMemWithRegister),
    row(MOV,     0xFE, 0b1100_0110, group(0b000),  0x00, 0x00, 0x01, 0xC0, 0x00, 0x07, ImmediateToRegMem),
    row(MOV,     0xF0, 0b1011_0000, ALWAYS,        0x00, 0x00, 0x08, 0x00, 0x07, 0x00, ImmediateToRegister),

    row(ADD,     0xFC, 0b0000_0000, ALWAYS,        0x02, 0x00, 0x01, 0xC0, 0x38, 0x07, RegMemWithRegister),
    row(ADD,     0xFC, 0b1000_0000, group(0b000),  0x00, 0x02, 0x01, 0xC0, 0x00, 0x07, ImmediateToRegMem),
    row(ADD,     0xFE, 0b0000_0100, ALWAYS,        0x00, 0x00, 0x01, 0x00, 0x00, 0x00, ImmediateToAccumulator),

    row(SUB,     0xFC, 0b0010_1000, ALWAYS,        0x02, 0x00, 0x01, 0xC0, 0x38, 0x07, RegMemWithRegister),
    row(SUB,     0xFC, 0b1000_0000, group(0b101),  0x00, 0x02, 0x01, 0xC0, 0x00, 0x07, ImmediateToRegMem),
    row(SUB,     0xFE, 0b0010_1100, ALWAYS,        0x00, 0x00, 0x01, 0x00, 0x00, 0x00, ImmediateToAccumulator),

    row(CMP,     0xFC, 0b0011_1000, ALWAYS,        0x02, 0x00, 0x01, 0xC0, 0x38, 0x07, RegMemWithRegister),
    row(CMP,     0xFC, 0b1000_0000, group(0b111),  0x00, 0x02, 0x01, 0xC0, 0x00, 0x07, ImmediateToRegMem),
    row(CMP,     0xFE, 0b0011_1100, ALWAYS,        0x00, 0x00, 0x01, 0x00, 0x00, 0x00, ImmediateToAccumulator),

    branch(JE,     0x74),
    branch(JL,     0x7C),
    branch(JLE,    0x7E),
    branch(JB,     0x72),
    branch(JBE,    0x76),
    branch(JP,     0x7A),
    branch(JO,     0x70),
    branch(JS,     0x78),
    branch(JNE,    0x75),
    branch(JNL,    0x7D),
    branch(JG,     0x7F),
    branch(JNB,    0x73),
    branch(JA,     0x77),
    branch(JNP,    0x7B),
    branch(JNO,    0x71),
    branch(JNS,    0x79),
    branch(LOOP,   0xE2),
    branch(LOOPZ,  0xE1),
    branch(LOOPNZ, 0xE0),
    branch(JCXZ,   0xE3),
];

/// The first encoding, in table order, that matches `first` and (if the row needs it) `second`.
pub fn find(first: u8, second: Option<u8>) -> Option<&'static Encoding> {
    ENCODINGS
        .iter()
        .find(|encoding| encoding.matches(first, second))
}

/// The encoding used to write `mnemonic` in the given shape.
pub fn find_for(mnemonic: Mnemonic, shape: Shape) -> Option<&'static Encoding> {
    ENCODINGS
        .iter()
        .find(|encoding| encoding.mnemonic == mnemonic && encoding.shape == shape)
}
