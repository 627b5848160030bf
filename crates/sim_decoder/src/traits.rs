use crate::{DecodeError, Result};
use sim_instruction::{Displacement, Immediate, OperandSize};

/// Reads the bytes of a single instruction from `memory`, keeping track of where the instruction
/// started and how much of it was consumed.
pub struct Reader<'a> {
    memory: &'a [u8],
    start: usize,
    position: usize,
}

impl<'a> Reader<'a> {
    pub fn new(memory: &'a [u8], address: usize) -> Self {
        Self {
            memory,
            start: address,
            position: address,
        }
    }

    /// The next byte, without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.memory.get(self.position).copied()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Everything consumed since the reader was created.
    pub fn consumed(&self) -> &'a [u8] {
        self.memory.get(self.start..self.position).unwrap_or(&[])
    }
}

impl Iterator for Reader<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }
}

pub trait ReadExt {
    fn read_u8(&mut self) -> Result<u8>;

    fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes([self.read_u8()?, self.read_u8()?]))
    }

    fn read_immediate(&mut self, operand_size: OperandSize) -> Result<Immediate> {
        Ok(match operand_size {
            OperandSize::Byte => Immediate::Byte(self.read_u8()?),
            OperandSize::Word => Immediate::Word(self.read_u16()?),
        })
    }

    fn read_displacement(&mut self, operand_size: OperandSize) -> Result<Displacement> {
        Ok(match operand_size {
            OperandSize::Byte => Displacement::Byte(self.read_u8()? as i8),
            OperandSize::Word => Displacement::Word(self.read_u16()? as i16),
        })
    }
}

impl ReadExt for Reader<'_> {
    fn read_u8(&mut self) -> Result<u8> {
        let address = self.start;
        self.next()
            .ok_or(DecodeError::CouldNotReadExtraBytes { address })
    }
}
