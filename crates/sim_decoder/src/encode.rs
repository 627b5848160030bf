use crate::errors::EncodeError;
use crate::mrrm::RegisterOrMemory;
use crate::table::{self, Encoding, Shape};
use sim_instruction::{Form, Immediate, Instruction, Operand, OperandSize};

type Result<T> = std::result::Result<T, EncodeError>;

/// Rebuild the bytes of `instruction` from its mnemonic, form and operands.
///
/// Fields are written back through the same [crate::BitField]s the decoder reads them with, so
/// `encode(&decode_instruction(bytes)?)` reproduces `bytes`.
pub fn encode(instruction: &Instruction) -> Result<Vec<u8>> {
    let encoding = table::find_for(instruction.mnemonic, Shape::from(instruction.form)).ok_or(
        EncodeError::NoEncoding {
            mnemonic: instruction.mnemonic,
            form: instruction.form,
        },
    )?;

    let illegal = || EncodeError::IllegalOperands(instruction.mnemonic);

    match instruction.form {
        Form::RegMemWithRegister { reg_is_destination } => {
            let (register, register_or_memory) = if reg_is_destination {
                (&instruction.destination, &instruction.source)
            } else {
                (&instruction.source, &instruction.destination)
            };

            let Operand::Register(register) = register else {
                return Err(illegal());
            };
            let size = register_or_memory.operand_size().ok_or_else(illegal)?;
            if size != register.size() {
                return Err(illegal());
            }
            let rm = RegisterOrMemory::from_operand(register_or_memory).ok_or_else(illegal)?;

            let first = encoding.primary.bits()
                | encoding.d.write(reg_is_destination as u8)
                | encoding.w.write(size.is_wide() as u8);

            let mut bytes = vec![first, mrrm_byte(encoding, &rm, register.register().encoding())];
            bytes.extend(rm.extra_bytes());
            Ok(bytes)
        }

        Form::ImmediateToRegMem => {
            let size = instruction.destination.operand_size().ok_or_else(illegal)?;
            let rm = RegisterOrMemory::from_operand(&instruction.destination).ok_or_else(illegal)?;
            let Operand::Immediate(immediate) = instruction.source else {
                return Err(illegal());
            };

            let sign_extended = matches!(immediate, Immediate::SignExtended(_));
            if sign_extended && (!encoding.s.is_present() || !size.is_wide()) {
                return Err(illegal());
            }

            let first = encoding.primary.bits()
                | encoding.s.write(sign_extended as u8)
                | encoding.w.write(size.is_wide() as u8);

            // No register here; the group selector comes from the secondary condition.
            let mut bytes = vec![first, mrrm_byte(encoding, &rm, 0)];
            bytes.extend(rm.extra_bytes());
            bytes.extend(immediate_bytes(immediate, size));
            Ok(bytes)
        }

        Form::ImmediateToAccumulator | Form::ImmediateToRegister => {
            let Operand::Register(register) = instruction.destination else {
                return Err(illegal());
            };
            let Operand::Immediate(immediate) = instruction.source else {
                return Err(illegal());
            };
            if instruction.form == Form::ImmediateToAccumulator
                && register.register().encoding() != 0
            {
                return Err(illegal());
            }

            let first = encoding.primary.bits()
                | encoding.w.write(register.is_wide() as u8)
                | encoding.reg.write(register.register().encoding());

            let mut bytes = vec![first];
            bytes.extend(immediate_bytes(immediate, register.size()));
            Ok(bytes)
        }

        Form::Branch => match instruction.branch_displacement() {
            Some(displacement) => Ok(vec![encoding.primary.bits(), displacement as u8]),
            None => Err(illegal()),
        },
    }
}

fn mrrm_byte(encoding: &Encoding, rm: &RegisterOrMemory, reg: u8) -> u8 {
    encoding.secondary.bits()
        | encoding.mode.write(rm.mode())
        | encoding.reg.write(reg)
        | encoding.rm.write(rm.rm())
}

/// The immediate takes the width of the operand it is combined with, unless it was encoded as a
/// single sign extended byte.
fn immediate_bytes(immediate: Immediate, size: OperandSize) -> Vec<u8> {
    match (immediate, size) {
        (Immediate::SignExtended(value), _) => vec![value as u8],
        (_, OperandSize::Byte) => vec![immediate.value() as u8],
        (_, OperandSize::Word) => immediate.value().to_le_bytes().to_vec(),
    }
}
