use crate::{Mnemonic, Operand};

/// How an instruction was laid out in memory. Together with the operands this is enough to
/// reproduce the original bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Form {
    /// A mod/reg/rm byte with a register operand in the reg field. `reg_is_destination` is the
    /// D bit.
    RegMemWithRegister { reg_is_destination: bool },
    /// A mod/rm byte followed by an immediate.
    ImmediateToRegMem,
    /// Short arithmetic form that always targets `al`/`ax`.
    ImmediateToAccumulator,
    /// Short `mov` form with the register encoded in the op code.
    ImmediateToRegister,
    /// Conditional jump or loop with an 8-bit displacement.
    Branch,
}

/// Representation of a decoded instruction.
///
/// ```rust
/// use sim_instruction::*;
///
/// // mov bx, [bp+di+10]
/// let i = Instruction {
///     mnemonic: Mnemonic::MOV,
///     destination: Operand::Register(RegisterAccess::word(Register::BlBx)),
///     source: Operand::Memory(MemoryAccess::based(
///         AddressingMode::BpDi,
///         Displacement::Byte(10),
///         OperandSize::Word,
///     )),
///     address: 0,
///     bytes: vec![0x8B, 0x5B, 0x0A],
///     form: Form::RegMemWithRegister { reg_is_destination: true },
/// };
/// assert_eq!(i.to_string(), "mov bx, [bp + di + 10]");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub destination: Operand,
    /// [Operand::None] for branches.
    pub source: Operand,
    /// Offset of the first byte in the memory the instruction was decoded from.
    pub address: usize,
    /// Exactly the bytes that were consumed to decode the instruction.
    pub bytes: Vec<u8>,
    pub form: Form,
}

impl Instruction {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset of the byte following this instruction.
    pub fn next_address(&self) -> usize {
        self.address + self.bytes.len()
    }

    /// For branches, the signed 8-bit displacement stored in the destination operand.
    pub fn branch_displacement(&self) -> Option<i8> {
        match (self.form, self.destination) {
            (Form::Branch, Operand::Immediate(immediate)) => Some(immediate.value() as u8 as i8),
            _ => None,
        }
    }
}
