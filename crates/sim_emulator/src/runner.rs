use crate::calc::{arithmetic, Add, Compare, Subtract};
use crate::error::{Error, Result};
use crate::flags::{FlagState, Flags};
use crate::memory::{read_value, write_value, Address, RandomAccessMemory};
use crate::registers::RegisterFile;
use crate::{DATA_MEMORY_SIZE, MAX_PROGRAM_SIZE};
use sim_decoder::{decode_instruction, DecodeError};
use sim_instruction::{
    Instruction, MemoryAccess, Mnemonic, Operand, OperandSize, Register, RegisterAccess,
};
use std::fmt::{Display, Formatter};
use tracing::{debug, error, warn};

/// Why a [Runner] stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Halt {
    /// `ip` reached the end of the program.
    EndOfProgram,
    /// The bytes at `ip` are not an instruction. Nothing of it was executed.
    InvalidInstruction(DecodeError),
    /// Executing an instruction accessed data memory out of range.
    Faulted,
}

impl Display for Halt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Halt::EndOfProgram => write!(f, "end of program"),
            Halt::InvalidInstruction(err) => write!(f, "{}", err),
            Halt::Faulted => write!(f, "memory fault"),
        }
    }
}

/// The register an instruction wrote, with its value before and after at the width it was
/// written with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterChange {
    pub access: RegisterAccess,
    pub previous: u16,
    pub current: u16,
}

impl Display for RegisterChange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.access.size() {
            OperandSize::Byte => write!(
                f,
                "{}:{:#04x}->{:#04x} ({})",
                self.access, self.previous, self.current, self.current as u8 as i8
            ),
            OperandSize::Word => write!(
                f,
                "{}:{:#06x}->{:#06x} ({})",
                self.access, self.previous, self.current, self.current as i16
            ),
        }
    }
}

/// Everything one executed instruction did to the state of the [Runner].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
    pub instruction: Instruction,
    pub ip_before: u16,
    pub ip_after: u16,
    /// `None` if the instruction wrote no register.
    pub register_change: Option<RegisterChange>,
    pub flags_before: FlagState,
    pub flags_after: FlagState,
}

impl Trace {
    /// `(name, before, after)` for every flag that changed.
    pub fn changed_flags(&self) -> impl Iterator<Item = (&'static str, bool, bool)> + '_ {
        self.flags_after.changes_from(&self.flags_before)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Executed(Trace),
    Halted(Halt),
}

/// Effective address of a memory operand: the base registers plus the displacement, wrapped to
/// 16 bits.
pub fn effective_address(registers: &RegisterFile, access: &MemoryAccess) -> u16 {
    access
        .terms()
        .iter()
        .flatten()
        .fold(access.displacement.value(), |address, term| {
            address.wrapping_add(registers.read(*term))
        })
}

/// Decodes and executes a program one instruction at a time.
///
/// The program is only ever read through `ip`. Data memory is separate and starts out zeroed.
pub struct Runner<'a> {
    program: &'a [u8],
    memory: RandomAccessMemory,
    registers: RegisterFile,
    flags: FlagState,
    ip: u16,
    /// Set when `ip` wrapped past the last byte of a full 64 KiB program.
    wrapped: bool,
    halted: Option<Halt>,
}

impl<'a> Runner<'a> {
    pub fn new(program: &'a [u8]) -> Result<Self> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge(program.len()));
        }

        Ok(Self {
            program,
            memory: RandomAccessMemory::with_capacity(DATA_MEMORY_SIZE),
            registers: RegisterFile::default(),
            flags: FlagState::default(),
            ip: 0,
            wrapped: false,
            halted: None,
        })
    }

    pub fn ip(&self) -> u16 {
        self.ip
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn flags(&self) -> &FlagState {
        &self.flags
    }

    pub fn memory(&self) -> &RandomAccessMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut RandomAccessMemory {
        &mut self.memory
    }

    pub fn halted(&self) -> Option<&Halt> {
        self.halted.as_ref()
    }

    /// The instruction at `ip`, without executing it.
    pub fn peek_instruction(&self) -> Result<Instruction> {
        Ok(decode_instruction(self.program, self.ip as usize)?)
    }

    /// Execute the instruction at `ip`.
    ///
    /// Once halted, every call returns the same [Step::Halted]. A data memory fault is returned
    /// as an error once, after which the runner is halted with [Halt::Faulted].
    pub fn step(&mut self) -> Result<Step> {
        if let Some(halt) = &self.halted {
            return Ok(Step::Halted(halt.clone()));
        }

        if self.wrapped || self.ip as usize >= self.program.len() {
            return Ok(self.halt(Halt::EndOfProgram));
        }

        let instruction = match self.peek_instruction() {
            Ok(instruction) => instruction,
            Err(Error::Decode(err)) => return Ok(self.halt(Halt::InvalidInstruction(err))),
            Err(err) => return Err(err),
        };

        self.registers.take_last_write();
        let registers_before = self.registers;
        let flags_before = self.flags;
        let ip_before = self.ip;

        let next_address = instruction.next_address();
        self.ip = next_address as u16;
        self.wrapped = next_address > u16::MAX as usize;

        if let Err(err) = self.execute(&instruction) {
            error!("{:04x}: {} ({})", ip_before, instruction, err);
            self.ip = ip_before;
            self.wrapped = false;
            self.halted = Some(Halt::Faulted);
            return Err(err);
        }

        let register_change = self
            .registers
            .take_last_write()
            .map(|access| RegisterChange {
                access,
                previous: registers_before.read(access),
                current: self.registers.read(access),
            });

        Ok(Step::Executed(Trace {
            instruction,
            ip_before,
            ip_after: self.ip,
            register_change,
            flags_before,
            flags_after: self.flags,
        }))
    }

    /// Step until halted, calling `on_step` for every executed instruction.
    pub fn run(&mut self, mut on_step: impl FnMut(&Trace)) -> Result<Halt> {
        loop {
            match self.step()? {
                Step::Executed(trace) => on_step(&trace),
                Step::Halted(halt) => return Ok(halt),
            }
        }
    }

    fn halt(&mut self, halt: Halt) -> Step {
        debug!("Halted at {:04x}: {}", self.ip, halt);
        self.halted = Some(halt.clone());
        Step::Halted(halt)
    }

    fn execute(&mut self, instruction: &Instruction) -> Result<()> {
        use Mnemonic::*;

        let destination = &instruction.destination;
        let source = &instruction.source;

        match instruction.mnemonic {
            MOV => {
                let size = destination
                    .operand_size()
                    .ok_or(Error::IllegalDataAccess)?;
                let value = self.read_operand(source, size)?;
                self.write_operand(destination, value)
            }

            mnemonic if mnemonic.is_arithmetic() => {
                let size = destination
                    .operand_size()
                    .ok_or(Error::IllegalDataAccess)?;
                let left = self.read_operand(destination, size)?;
                let right = self.read_operand(source, size)?;

                let flags = &mut self.flags;
                let result = match mnemonic {
                    ADD => arithmetic(Add, size, left, right, flags),
                    SUB => arithmetic(Subtract, size, left, right, flags),
                    _ => arithmetic(Compare, size, left, right, flags),
                };

                if mnemonic == CMP {
                    Ok(())
                } else {
                    self.write_operand(destination, result)
                }
            }

            mnemonic => {
                let displacement = instruction
                    .branch_displacement()
                    .ok_or(Error::IllegalDataAccess)?;
                if self.branch_taken(mnemonic) {
                    self.ip = self.ip.wrapping_add(displacement as i16 as u16);
                    self.wrapped = false;
                }
                Ok(())
            }
        }
    }

    fn branch_taken(&mut self, mnemonic: Mnemonic) -> bool {
        use Mnemonic::*;

        let zero = self.flags.test(Flags::ZERO);
        let sign = self.flags.test(Flags::SIGN);

        match mnemonic {
            JE => zero,
            JNE => !zero,
            JS => sign,
            JNS => !sign,

            LOOP | LOOPZ | LOOPNZ => {
                let cx = self.registers.word(Register::ClCx).wrapping_sub(1);
                self.registers.set_word(Register::ClCx, cx);
                cx != 0
                    && match mnemonic {
                        LOOPZ => zero,
                        LOOPNZ => !zero,
                        _ => true,
                    }
            }

            JCXZ => self.registers.word(Register::ClCx) == 0,

            _ => {
                warn!("{} depends on flags that are not modeled, not taken", mnemonic);
                false
            }
        }
    }

    fn read_operand(&self, operand: &Operand, size: OperandSize) -> Result<u16> {
        match operand {
            Operand::Register(access) => Ok(self.registers.read(*access)),
            Operand::Memory(access) => {
                read_value(&self.memory, self.data_address(access), access.size)
            }
            Operand::Immediate(immediate) => Ok(match size {
                OperandSize::Byte => immediate.value() & 0x00FF,
                OperandSize::Word => immediate.value(),
            }),
            Operand::None => Err(Error::IllegalDataAccess),
        }
    }

    fn write_operand(&mut self, operand: &Operand, value: u16) -> Result<()> {
        match operand {
            Operand::Register(access) => {
                self.registers.write(*access, value);
                Ok(())
            }
            Operand::Memory(access) => {
                let address = self.data_address(access);
                write_value(&mut self.memory, address, access.size, value)
            }
            Operand::Immediate(_) | Operand::None => Err(Error::IllegalDataAccess),
        }
    }

    fn data_address(&self, access: &MemoryAccess) -> Address {
        effective_address(&self.registers, access) as Address
    }
}
