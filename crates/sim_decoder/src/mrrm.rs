use crate::errors::Result;
use crate::traits::ReadExt;
use sim_instruction::{
    AddressingMode, Displacement, MemoryAccess, Operand, OperandSize, Register, RegisterAccess,
};

/// The operand selected by the mod and r/m fields, before a size is attached to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegisterOrMemory {
    Direct(u16),
    Indirect(AddressingMode),
    DisplacementByte(AddressingMode, i8),
    DisplacementWord(AddressingMode, i16),
    Register(Register),
}

impl RegisterOrMemory {
    /// Reads any displacement the mode requires from `reader`.
    pub fn try_from_mrrm(mode: u8, rm: u8, reader: &mut impl ReadExt) -> Result<Self> {
        Ok(match mode & 0b11 {
            0b00 => match rm {
                0b110 => RegisterOrMemory::Direct(reader.read_u16()?),
                _ => RegisterOrMemory::Indirect(AddressingMode::from_encoding(rm)),
            },

            0b01 => RegisterOrMemory::DisplacementByte(
                AddressingMode::from_encoding(rm),
                reader.read_u8()? as i8,
            ),

            0b10 => RegisterOrMemory::DisplacementWord(
                AddressingMode::from_encoding(rm),
                reader.read_u16()? as i16,
            ),

            _ => RegisterOrMemory::Register(Register::from_encoding(rm)),
        })
    }

    /// The inverse of [RegisterOrMemory::into_operand]. Immediates have no mod/rm form.
    pub fn from_operand(operand: &Operand) -> Option<Self> {
        match operand {
            Operand::Register(access) => Some(RegisterOrMemory::Register(access.register())),

            Operand::Memory(access) => Some(match (access.base, access.displacement) {
                (None, displacement) => RegisterOrMemory::Direct(displacement.value()),
                (Some(base), Displacement::None) => RegisterOrMemory::Indirect(base),
                (Some(base), Displacement::Byte(offset)) => {
                    RegisterOrMemory::DisplacementByte(base, offset)
                }
                (Some(base), Displacement::Word(offset)) => {
                    RegisterOrMemory::DisplacementWord(base, offset)
                }
            }),

            Operand::Immediate(_) | Operand::None => None,
        }
    }

    pub fn into_operand(self, operand_size: OperandSize) -> Operand {
        match self {
            RegisterOrMemory::Direct(address) => {
                Operand::Memory(MemoryAccess::direct(address, operand_size))
            }
            RegisterOrMemory::Indirect(base) => Operand::Memory(MemoryAccess::based(
                base,
                Displacement::None,
                operand_size,
            )),
            RegisterOrMemory::DisplacementByte(base, offset) => Operand::Memory(
                MemoryAccess::based(base, Displacement::Byte(offset), operand_size),
            ),
            RegisterOrMemory::DisplacementWord(base, offset) => Operand::Memory(
                MemoryAccess::based(base, Displacement::Word(offset), operand_size),
            ),
            RegisterOrMemory::Register(register) => {
                Operand::Register(RegisterAccess(register, operand_size))
            }
        }
    }

    pub fn mode(&self) -> u8 {
        match self {
            RegisterOrMemory::Direct(_) | RegisterOrMemory::Indirect(_) => 0b00,
            RegisterOrMemory::DisplacementByte(..) => 0b01,
            RegisterOrMemory::DisplacementWord(..) => 0b10,
            RegisterOrMemory::Register(_) => 0b11,
        }
    }

    pub fn rm(&self) -> u8 {
        match self {
            RegisterOrMemory::Direct(_) => 0b110,
            RegisterOrMemory::Indirect(base)
            | RegisterOrMemory::DisplacementByte(base, _)
            | RegisterOrMemory::DisplacementWord(base, _) => base.encoding(),
            RegisterOrMemory::Register(register) => register.encoding(),
        }
    }

    /// Bytes that follow the mod/reg/rm byte.
    pub fn extra_bytes(&self) -> Vec<u8> {
        match self {
            RegisterOrMemory::Direct(address) => address.to_le_bytes().to_vec(),
            RegisterOrMemory::DisplacementByte(_, offset) => vec![*offset as u8],
            RegisterOrMemory::DisplacementWord(_, offset) => offset.to_le_bytes().to_vec(),
            RegisterOrMemory::Indirect(_) | RegisterOrMemory::Register(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reader;

    fn decode(mode: u8, rm: u8, extra: &[u8]) -> RegisterOrMemory {
        let mut reader = Reader::new(extra, 0);
        RegisterOrMemory::try_from_mrrm(mode, rm, &mut reader).unwrap()
    }

    #[test]
    fn modes() {
        assert_eq!(decode(0b00, 0b000, &[]), RegisterOrMemory::Indirect(AddressingMode::BxSi));
        assert_eq!(decode(0b00, 0b110, &[0x01, 0x01]), RegisterOrMemory::Direct(0x0101));
        assert_eq!(
            decode(0b01, 0b110, &[0xFF]),
            RegisterOrMemory::DisplacementByte(AddressingMode::Bp, -1)
        );
        assert_eq!(
            decode(0b10, 0b011, &[0x01, 0x01]),
            RegisterOrMemory::DisplacementWord(AddressingMode::BpDi, 257)
        );
        assert_eq!(decode(0b11, 0b110, &[]), RegisterOrMemory::Register(Register::DhSi));
    }

    #[test]
    fn zero_displacement_is_kept() {
        let operand = decode(0b01, 0b111, &[0x00]).into_operand(OperandSize::Word);
        assert_eq!(
            operand,
            Operand::Memory(MemoryAccess::based(
                AddressingMode::Bx,
                Displacement::Byte(0),
                OperandSize::Word
            ))
        );
    }

    #[test]
    fn truncated_displacement() {
        let mut reader = Reader::new(&[0x01], 0);
        assert!(RegisterOrMemory::try_from_mrrm(0b10, 0b000, &mut reader).is_err());
    }

    #[test]
    fn operand_round_trip() {
        let cases = [
            RegisterOrMemory::Direct(0x1234),
            RegisterOrMemory::Indirect(AddressingMode::Si),
            RegisterOrMemory::DisplacementByte(AddressingMode::BxDi, -3),
            RegisterOrMemory::DisplacementWord(AddressingMode::Bp, 1000),
            RegisterOrMemory::Register(Register::ChBp),
        ];

        for rm in cases {
            let operand = rm.into_operand(OperandSize::Byte);
            assert_eq!(RegisterOrMemory::from_operand(&operand), Some(rm));
        }
    }
}
