use crate::error::{Error, Result};
use sim_instruction::OperandSize;

pub type Address = u32;

/// An object where bytes can be read from or written to.
pub trait BusInterface {
    fn read(&self, address: Address) -> Result<u8>;
    fn write(&mut self, address: Address, value: u8) -> Result<()>;
}

/// Read a byte or a little endian word.
pub fn read_value(bus: &impl BusInterface, address: Address, size: OperandSize) -> Result<u16> {
    Ok(match size {
        OperandSize::Byte => bus.read(address)? as u16,
        OperandSize::Word => u16::from_le_bytes([bus.read(address)?, bus.read(address + 1)?]),
    })
}

/// Write a byte (the low byte of `value`) or a little endian word.
///
/// Both bytes of a word are checked before anything is written.
pub fn write_value(
    bus: &mut impl BusInterface,
    address: Address,
    size: OperandSize,
    value: u16,
) -> Result<()> {
    match size {
        OperandSize::Byte => bus.write(address, value as u8),
        OperandSize::Word => {
            bus.read(address + 1)?;
            let [low, high] = value.to_le_bytes();
            bus.write(address, low)?;
            bus.write(address + 1, high)
        }
    }
}

pub struct RandomAccessMemory {
    data: Vec<u8>,
}

impl RandomAccessMemory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl BusInterface for RandomAccessMemory {
    fn read(&self, address: Address) -> Result<u8> {
        self.data
            .get(address as usize)
            .copied()
            .ok_or(Error::AddressOutOfRange(address))
    }

    fn write(&mut self, address: Address, value: u8) -> Result<()> {
        let byte = self
            .data
            .get_mut(address as usize)
            .ok_or(Error::AddressOutOfRange(address))?;
        *byte = value;
        Ok(())
    }
}
