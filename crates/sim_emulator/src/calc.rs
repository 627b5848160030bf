use crate::flags::{FlagState, Flags};
use sim_instruction::OperandSize;

pub trait SizedValueTraits {
    fn is_zero(&self) -> bool;
    fn is_signed(&self) -> bool;
}

impl SizedValueTraits for u8 {
    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn is_signed(&self) -> bool {
        *self & 0x80 != 0
    }
}

impl SizedValueTraits for u16 {
    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn is_signed(&self) -> bool {
        *self & 0x8000 != 0
    }
}

impl FlagState {
    fn set_from_result<T: SizedValueTraits>(&mut self, result: T) {
        self.set(Flags::ZERO, result.is_zero());
        self.set(Flags::SIGN, result.is_signed());
    }
}

pub trait Operation<T> {
    fn op(self, left: T, right: T, flags: &mut FlagState) -> T;
}

pub struct Add;
pub struct Subtract;
/// Returns `left`; only the flags of the subtraction are kept.
pub struct Compare;

impl Operation<u8> for Add {
    fn op(self, left: u8, right: u8, flags: &mut FlagState) -> u8 {
        let result = left.wrapping_add(right);
        flags.set_from_result(result);
        result
    }
}

impl Operation<u16> for Add {
    fn op(self, left: u16, right: u16, flags: &mut FlagState) -> u16 {
        let result = left.wrapping_add(right);
        flags.set_from_result(result);
        result
    }
}

impl Operation<u8> for Subtract {
    fn op(self, left: u8, right: u8, flags: &mut FlagState) -> u8 {
        let result = left.wrapping_sub(right);
        flags.set_from_result(result);
        result
    }
}

impl Operation<u16> for Subtract {
    fn op(self, left: u16, right: u16, flags: &mut FlagState) -> u16 {
        let result = left.wrapping_sub(right);
        flags.set_from_result(result);
        result
    }
}

impl Operation<u8> for Compare {
    fn op(self, left: u8, right: u8, flags: &mut FlagState) -> u8 {
        Operation::<u8>::op(Subtract, left, right, flags);
        left
    }
}

impl Operation<u16> for Compare {
    fn op(self, left: u16, right: u16, flags: &mut FlagState) -> u16 {
        Operation::<u16>::op(Subtract, left, right, flags);
        left
    }
}

/// Run `operation` on the low byte or the full word of both operands.
pub fn arithmetic<O>(
    operation: O,
    size: OperandSize,
    left: u16,
    right: u16,
    flags: &mut FlagState,
) -> u16
where
    O: Operation<u8> + Operation<u16>,
{
    match size {
        OperandSize::Byte => {
            Operation::<u8>::op(operation, left as u8, right as u8, flags) as u16
        }
        OperandSize::Word => Operation::<u16>::op(operation, left, right, flags),
    }
}
