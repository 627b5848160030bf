use crate::OperandSize;

/// One of the eight general register slots, named after the byte and word registers that share
/// its encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Register {
    AlAx,
    ClCx,
    DlDx,
    BlBx,
    AhSp,
    ChBp,
    DhSi,
    BhDi,
}

impl Register {
    pub const ALL: [Register; 8] = [
        Register::AlAx,
        Register::ClCx,
        Register::DlDx,
        Register::BlBx,
        Register::AhSp,
        Register::ChBp,
        Register::DhSi,
        Register::BhDi,
    ];

    /// Only the low 3 bits of `encoding` are used.
    pub fn from_encoding(encoding: u8) -> Self {
        Self::ALL[(encoding & 0b111) as usize]
    }

    pub fn encoding(self) -> u8 {
        self as u8
    }
}

/// A register together with the width it is accessed with.
///
/// For word access the register is the full 16-bit slot (`ax`..`di`). For byte access,
/// encodings 0-3 address the low halves of `ax`..`bx` and 4-7 address their high halves
/// (`ah`..`bh`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegisterAccess(pub Register, pub OperandSize);

impl RegisterAccess {
    pub fn byte(register: Register) -> Self {
        Self(register, OperandSize::Byte)
    }

    pub fn word(register: Register) -> Self {
        Self(register, OperandSize::Word)
    }

    pub fn register(&self) -> Register {
        self.0
    }

    pub fn size(&self) -> OperandSize {
        self.1
    }

    pub fn is_wide(&self) -> bool {
        self.1 == OperandSize::Word
    }
}

impl std::fmt::Display for RegisterAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Register::*;

        let name = match self.1 {
            OperandSize::Byte => match self.0 {
                AlAx => "al",
                ClCx => "cl",
                DlDx => "dl",
                BlBx => "bl",
                AhSp => "ah",
                ChBp => "ch",
                DhSi => "dh",
                BhDi => "bh",
            },

            OperandSize::Word => match self.0 {
                AlAx => "ax",
                ClCx => "cx",
                DlDx => "dx",
                BlBx => "bx",
                AhSp => "sp",
                ChBp => "bp",
                DhSi => "si",
                BhDi => "di",
            },
        };

        f.pad(name)
    }
}
