//! Table driven decoder (and encoder) for the 8086 subset described by [table::ENCODINGS].

mod bit_field;
mod decode;
mod encode;
mod errors;
mod mrrm;
pub mod table;
mod traits;

#[cfg(test)]
mod test;

pub use bit_field::{BitField, MatchCondition};
pub use decode::{decode_instruction, try_decode};
pub use encode::encode;
pub use errors::{DecodeError, EncodeError, Result};
pub use table::{Encoding, Shape};
pub use traits::{ReadExt, Reader};
