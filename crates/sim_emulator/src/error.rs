use crate::Address;
use sim_decoder::DecodeError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Could not decode instruction! {0}")]
    Decode(#[from] DecodeError),

    #[error("Address out of range! ({0:#06x})")]
    AddressOutOfRange(Address),

    #[error("Trying to access data in invalid way!")]
    IllegalDataAccess,

    #[error("Program is too large! ({0} bytes)")]
    ProgramTooLarge(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
