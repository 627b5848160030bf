use sim_instruction::{Form, Mnemonic};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Address out of range ({0:#06x})")]
    AddressOutOfRange(usize),

    #[error("Could not fetch extra bytes for instruction at {address:#06x}")]
    CouldNotReadExtraBytes { address: usize },

    #[error("Invalid op code ({op_code:#04x}) at {address:#06x}")]
    InvalidOpCode { op_code: u8, address: usize },
}

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("No encoding for {mnemonic} in form {form:?}")]
    NoEncoding { mnemonic: Mnemonic, form: Form },

    #[error("Illegal operands for {0}")]
    IllegalOperands(Mnemonic),
}
