//! This crate holds all the structs and constants to represent a decoded instruction for the
//! 8086 subset understood by the decoder and the emulator.

mod display;
mod instruction;
mod mnemonic;
mod operand;
mod register;

pub use instruction::{Form, Instruction};
pub use mnemonic::Mnemonic;
pub use operand::{AddressingMode, Displacement, Immediate, MemoryAccess, Operand, OperandSize};
pub use register::{Register, RegisterAccess};
