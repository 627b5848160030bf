use crate::{Register, RegisterAccess};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandSize {
    Byte,
    Word,
}

impl OperandSize {
    pub fn from_wide(is_wide: bool) -> Self {
        if is_wide {
            OperandSize::Word
        } else {
            OperandSize::Byte
        }
    }

    pub fn is_wide(self) -> bool {
        self == OperandSize::Word
    }
}

/// The base register combinations selected by the r/m field of a memory operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    BxSi,
    BxDi,
    BpSi,
    BpDi,
    Si,
    Di,
    Bp,
    Bx,
}

impl AddressingMode {
    const ALL: [AddressingMode; 8] = [
        AddressingMode::BxSi,
        AddressingMode::BxDi,
        AddressingMode::BpSi,
        AddressingMode::BpDi,
        AddressingMode::Si,
        AddressingMode::Di,
        AddressingMode::Bp,
        AddressingMode::Bx,
    ];

    /// Only the low 3 bits of `rm` are used.
    pub fn from_encoding(rm: u8) -> Self {
        Self::ALL[(rm & 0b111) as usize]
    }

    pub fn encoding(self) -> u8 {
        self as u8
    }

    /// The base registers that are summed to form the effective address. Unused terms are `None`.
    pub fn terms(self) -> [Option<Register>; 2] {
        use AddressingMode::*;
        use Register::*;

        match self {
            BxSi => [Some(BlBx), Some(DhSi)],
            BxDi => [Some(BlBx), Some(BhDi)],
            BpSi => [Some(ChBp), Some(DhSi)],
            BpDi => [Some(ChBp), Some(BhDi)],
            Si => [Some(DhSi), None],
            Di => [Some(BhDi), None],
            Bp => [Some(ChBp), None],
            Bx => [Some(BlBx), None],
        }
    }
}

/// Constant added to the base registers of a memory operand. The variant records how many bytes
/// were used to encode it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Displacement {
    None,
    Byte(i8),
    Word(i16),
}

impl Displacement {
    /// The displacement sign extended to 16 bits.
    pub fn value(self) -> u16 {
        match self {
            Displacement::None => 0,
            Displacement::Byte(offset) => offset as i16 as u16,
            Displacement::Word(offset) => offset as u16,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Immediate {
    Byte(u8),
    Word(u16),
    /// A single encoded byte widened by replicating bit 7.
    SignExtended(i8),
}

impl Immediate {
    pub fn value(self) -> u16 {
        match self {
            Immediate::Byte(value) => value as u16,
            Immediate::Word(value) => value,
            Immediate::SignExtended(value) => value as i16 as u16,
        }
    }
}

/// A memory operand: `base` registers plus `displacement`, accessed with `size`.
///
/// A `base` of `None` is a direct address, in which case the displacement holds the address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemoryAccess {
    pub base: Option<AddressingMode>,
    pub displacement: Displacement,
    pub size: OperandSize,
}

impl MemoryAccess {
    pub fn direct(address: u16, size: OperandSize) -> Self {
        Self {
            base: None,
            displacement: Displacement::Word(address as i16),
            size,
        }
    }

    pub fn based(base: AddressingMode, displacement: Displacement, size: OperandSize) -> Self {
        Self {
            base: Some(base),
            displacement,
            size,
        }
    }

    /// Up to two base register terms, always accessed as words.
    pub fn terms(&self) -> [Option<RegisterAccess>; 2] {
        match self.base {
            Some(base) => base.terms().map(|term| term.map(RegisterAccess::word)),
            None => [None, None],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Register(RegisterAccess),
    Memory(MemoryAccess),
    Immediate(Immediate),
    None,
}

impl Operand {
    /// The width of a register or memory operand. Immediates take the width of the operand they
    /// are combined with, so they have none of their own.
    pub fn operand_size(&self) -> Option<OperandSize> {
        match self {
            Operand::Register(access) => Some(access.size()),
            Operand::Memory(access) => Some(access.size),
            Operand::Immediate(_) | Operand::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Operand::None)
    }
}
