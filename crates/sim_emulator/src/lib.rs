//! Executes programs decoded by [sim_decoder] against a register file, two status flags and
//! 64 KiB of data memory.

mod calc;
mod error;
mod flags;
mod memory;
mod registers;
mod runner;


pub use error::{Error, Result};
pub use flags::{FlagState, Flags};
pub use memory::{read_value, write_value, Address, BusInterface, RandomAccessMemory};
pub use registers::RegisterFile;
pub use runner::{effective_address, Halt, RegisterChange, Runner, Step, Trace};

/// Size of the data memory every [Runner] starts with.
pub const DATA_MEMORY_SIZE: usize = 0x10000;

/// The largest program `ip` can address.
pub const MAX_PROGRAM_SIZE: usize = 0x10000;
