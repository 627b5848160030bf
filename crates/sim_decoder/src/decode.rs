use crate::errors::{DecodeError, Result};
use crate::mrrm::RegisterOrMemory;
use crate::table::{self, Encoding, Shape};
use crate::traits::{ReadExt, Reader};
use sim_instruction::{
    Form, Immediate, Instruction, Mnemonic, Operand, OperandSize, Register, RegisterAccess,
};
use tracing::trace;

/// The sub-fields of an instruction, extracted with the bit fields of its [Encoding].
#[derive(Debug)]
struct Fields {
    is_reg_destination: bool,
    is_sign_extended: bool,
    operand_size: OperandSize,
    mode: u8,
    reg: u8,
    rm: u8,
}

impl Fields {
    /// For the short forms, where everything lives in the op code.
    fn from_op_code(encoding: &Encoding, op_code: u8) -> Self {
        Self::from_bytes(encoding, op_code, op_code)
    }

    fn from_bytes(encoding: &Encoding, op_code: u8, mrrm: u8) -> Self {
        Self {
            is_reg_destination: encoding.d.read(op_code) != 0,
            is_sign_extended: encoding.s.read(op_code) != 0,
            operand_size: OperandSize::from_wide(encoding.w.read(op_code) != 0),
            mode: encoding.mode.read(mrrm),
            reg: encoding.reg.read(mrrm),
            rm: encoding.rm.read(mrrm),
        }
    }
}

/// Decode the instruction that starts at `address` in `memory`.
pub fn decode_instruction(memory: &[u8], address: usize) -> Result<Instruction> {
    let mut reader = Reader::new(memory, address);

    let op_code = reader
        .peek()
        .ok_or(DecodeError::AddressOutOfRange(address))?;
    let second = memory.get(address + 1).copied();

    let encoding = table::find(op_code, second)
        .ok_or(DecodeError::InvalidOpCode { op_code, address })?;

    // Consume the op code only once we know it is valid.
    reader.read_u8()?;

    let (destination, source, form) = match encoding.shape {
        Shape::RegMemWithRegister => reg_mem_with_register(&mut reader, encoding, op_code)?,
        Shape::ImmediateToRegMem => immediate_to_reg_mem(&mut reader, encoding, op_code)?,
        Shape::ImmediateToAccumulator => immediate_to_accumulator(&mut reader, encoding, op_code)?,
        Shape::ImmediateToRegister => immediate_to_register(&mut reader, encoding, op_code)?,
        Shape::Branch => branch(&mut reader)?,
    };

    let instruction = Instruction {
        mnemonic: encoding.mnemonic,
        destination,
        source,
        address: reader.start(),
        bytes: reader.consumed().to_vec(),
        form,
    };

    trace!("{:04x}: {}", instruction.address, instruction);

    Ok(instruction)
}

/// Like [decode_instruction], for callers that only care whether there is an instruction.
pub fn try_decode(memory: &[u8], address: usize) -> Option<Instruction> {
    decode_instruction(memory, address).ok()
}

type Decoded = (Operand, Operand, Form);

fn reg_mem_with_register(reader: &mut Reader, encoding: &Encoding, op_code: u8) -> Result<Decoded> {
    let mrrm = reader.read_u8()?;
    let fields = Fields::from_bytes(encoding, op_code, mrrm);

    let register = Operand::Register(RegisterAccess(
        Register::from_encoding(fields.reg),
        fields.operand_size,
    ));
    let register_or_memory = RegisterOrMemory::try_from_mrrm(fields.mode, fields.rm, reader)?
        .into_operand(fields.operand_size);

    let form = Form::RegMemWithRegister {
        reg_is_destination: fields.is_reg_destination,
    };

    Ok(if fields.is_reg_destination {
        (register, register_or_memory, form)
    } else {
        (register_or_memory, register, form)
    })
}

fn immediate_to_reg_mem(reader: &mut Reader, encoding: &Encoding, op_code: u8) -> Result<Decoded> {
    let mrrm = reader.read_u8()?;
    let fields = Fields::from_bytes(encoding, op_code, mrrm);

    let destination = RegisterOrMemory::try_from_mrrm(fields.mode, fields.rm, reader)?
        .into_operand(fields.operand_size);

    // `mov` has no S bit; for the arithmetic group a wide operation with S set carries a single
    // byte.
    let immediate = if encoding.mnemonic != Mnemonic::MOV
        && fields.operand_size.is_wide()
        && fields.is_sign_extended
    {
        Immediate::SignExtended(reader.read_u8()? as i8)
    } else {
        reader.read_immediate(fields.operand_size)?
    };

    Ok((
        destination,
        Operand::Immediate(immediate),
        Form::ImmediateToRegMem,
    ))
}

fn immediate_to_accumulator(
    reader: &mut Reader,
    encoding: &Encoding,
    op_code: u8,
) -> Result<Decoded> {
    let fields = Fields::from_op_code(encoding, op_code);

    let accumulator = Operand::Register(RegisterAccess(Register::AlAx, fields.operand_size));
    let immediate = reader.read_immediate(fields.operand_size)?;

    Ok((
        accumulator,
        Operand::Immediate(immediate),
        Form::ImmediateToAccumulator,
    ))
}

fn immediate_to_register(
    reader: &mut Reader,
    encoding: &Encoding,
    op_code: u8,
) -> Result<Decoded> {
    let fields = Fields::from_op_code(encoding, op_code);

    let register = Operand::Register(RegisterAccess(
        Register::from_encoding(fields.reg),
        fields.operand_size,
    ));
    let immediate = reader.read_immediate(fields.operand_size)?;

    Ok((
        register,
        Operand::Immediate(immediate),
        Form::ImmediateToRegister,
    ))
}

fn branch(reader: &mut Reader) -> Result<Decoded> {
    let displacement = reader.read_u8()?;

    Ok((
        Operand::Immediate(Immediate::Byte(displacement)),
        Operand::None,
        Form::Branch,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_instruction::{AddressingMode, Displacement, MemoryAccess};

    fn word(register: Register) -> Operand {
        Operand::Register(RegisterAccess::word(register))
    }

    fn byte(register: Register) -> Operand {
        Operand::Register(RegisterAccess::byte(register))
    }

    #[test]
    fn direction_bit_selects_destination() {
        // mov cx, bx
        let i = decode_instruction(&[0x89, 0xD9], 0).unwrap();
        assert_eq!(i.destination, word(Register::ClCx));
        assert_eq!(i.source, word(Register::BlBx));
        assert_eq!(i.form, Form::RegMemWithRegister { reg_is_destination: false });

        // mov bx, cx
        let i = decode_instruction(&[0x8B, 0xD9], 0).unwrap();
        assert_eq!(i.destination, word(Register::BlBx));
        assert_eq!(i.source, word(Register::ClCx));
        assert_eq!(i.form, Form::RegMemWithRegister { reg_is_destination: true });
    }

    #[test]
    fn byte_registers() {
        // mov ah, al
        let i = decode_instruction(&[0x88, 0xC4], 0).unwrap();
        assert_eq!(i.destination, byte(Register::AhSp));
        assert_eq!(i.source, byte(Register::AlAx));
        assert_eq!(i.to_string(), "mov ah, al");
    }

    #[test]
    fn memory_with_displacement() {
        // mov bx, [bp + di + 10]
        let i = decode_instruction(&[0x8B, 0x5B, 0x0A], 0).unwrap();
        assert_eq!(
            i.source,
            Operand::Memory(MemoryAccess::based(
                AddressingMode::BpDi,
                Displacement::Byte(10),
                OperandSize::Word
            ))
        );
        assert_eq!(i.bytes, vec![0x8B, 0x5B, 0x0A]);
    }

    #[test]
    fn direct_address() {
        // mov bp, [5]
        let i = decode_instruction(&[0x8B, 0x2E, 0x05, 0x00], 0).unwrap();
        assert_eq!(
            i.source,
            Operand::Memory(MemoryAccess::direct(5, OperandSize::Word))
        );
        assert_eq!(i.len(), 4);
    }

    #[test]
    fn immediate_sizes() {
        // add si, 2 (sign extended)
        let i = decode_instruction(&[0x83, 0xC6, 0x02], 0).unwrap();
        assert_eq!(i.mnemonic, Mnemonic::ADD);
        assert_eq!(i.source, Operand::Immediate(Immediate::SignExtended(2)));

        // sub bx, -2 (sign extended)
        let i = decode_instruction(&[0x83, 0xEB, 0xFE], 0).unwrap();
        assert_eq!(i.mnemonic, Mnemonic::SUB);
        assert_eq!(i.source.to_string(), "-2");
        if let Operand::Immediate(immediate) = i.source {
            assert_eq!(immediate.value(), 0xFFFE);
        }

        // cmp word [bx], 1000
        let i = decode_instruction(&[0x81, 0x3F, 0xE8, 0x03], 0).unwrap();
        assert_eq!(i.mnemonic, Mnemonic::CMP);
        assert_eq!(i.source, Operand::Immediate(Immediate::Word(1000)));
        assert_eq!(i.to_string(), "cmp word [bx], 1000");

        // mov word [bp + di], 0xFF (no sign extension for mov)
        let i = decode_instruction(&[0xC7, 0x03, 0xFF, 0x00], 0).unwrap();
        assert_eq!(i.source, Operand::Immediate(Immediate::Word(0x00FF)));

        // add byte [bx], 5
        let i = decode_instruction(&[0x80, 0x07, 0x05], 0).unwrap();
        assert_eq!(i.source, Operand::Immediate(Immediate::Byte(5)));
        assert_eq!(i.to_string(), "add byte [bx], 5");
    }

    #[test]
    fn short_forms() {
        let i = decode_instruction(&[0xB1, 0x0C], 0).unwrap();
        assert_eq!(i.to_string(), "mov cl, 12");

        let i = decode_instruction(&[0xBA, 0x6C, 0x0F], 0).unwrap();
        assert_eq!(i.to_string(), "mov dx, 3948");

        let i = decode_instruction(&[0x2C, 0x09], 0).unwrap();
        assert_eq!(i.to_string(), "sub al, 9");

        let i = decode_instruction(&[0x3D, 0xE8, 0x03], 0).unwrap();
        assert_eq!(i.to_string(), "cmp ax, 1000");
    }

    #[test]
    fn branch_displacement() {
        let i = decode_instruction(&[0x90, 0x75, 0xFE], 1).unwrap();
        assert_eq!(i.mnemonic, Mnemonic::JNE);
        assert_eq!(i.address, 1);
        assert_eq!(i.bytes, vec![0x75, 0xFE]);
        assert_eq!(i.source, Operand::None);
        assert_eq!(i.branch_displacement(), Some(-2));
        assert_eq!(i.to_string(), "jne $+0");
    }

    #[test]
    fn failures() {
        assert_eq!(
            decode_instruction(&[0xF1], 0),
            Err(DecodeError::InvalidOpCode {
                op_code: 0xF1,
                address: 0
            })
        );
        assert_eq!(
            decode_instruction(&[0xB8, 0x05], 0),
            Err(DecodeError::CouldNotReadExtraBytes { address: 0 })
        );
        assert_eq!(
            decode_instruction(&[0xB8], 3),
            Err(DecodeError::AddressOutOfRange(3))
        );
        assert_eq!(try_decode(&[0x75], 0), None);
    }
}
