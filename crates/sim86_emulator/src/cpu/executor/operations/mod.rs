//! Flag computing ALU functions, generated once per operand width.
//!
//! Every function takes the destination value first.  Functions that return `None` compute flags
//! only and leave the destination untouched.

mod arithmetic;
mod logic;

pub trait SignificantBit {
    fn most_significant_bit(&self) -> bool;
}

macro_rules! significant_bit {
    ($t:ident) => {
        impl SignificantBit for $t {
            fn most_significant_bit(&self) -> bool {
                self & (0x1 << (<$t>::BITS - 1)) != 0
            }
        }
    };
}

significant_bit!(u8);
significant_bit!(u16);

/// Even number of set bits in the low byte.
pub(crate) fn parity_for(value: u8) -> bool {
    value.count_ones() % 2 == 0
}

pub mod byte {
    use super::SignificantBit;
    use crate::cpu::Flags;

    pub fn flags_from_result(flags: &mut Flags, result: u8) {
        flags.set(Flags::ZERO, result == 0);
        flags.set(Flags::SIGN, result.most_significant_bit());
        flags.set(Flags::PARITY, super::parity_for(result));
    }

    pub use super::arithmetic::byte::{
        add, add_with_carry, compare, decrement, increment, multiply, negate, signed_multiply,
        subtract, subtract_with_borrow,
    };
    pub use super::logic::byte::{
        and, exclusive_or, not, or, shift_arithmetic_right, shift_left, shift_right, test,
    };
}

pub mod word {
    use super::SignificantBit;
    use crate::cpu::Flags;

    pub fn flags_from_result(flags: &mut Flags, result: u16) {
        flags.set(Flags::ZERO, result == 0);
        flags.set(Flags::SIGN, result.most_significant_bit());
        flags.set(Flags::PARITY, super::parity_for(result as u8));
    }

    pub use super::arithmetic::word::{
        add, add_with_carry, compare, decrement, increment, multiply, negate, signed_multiply,
        subtract, subtract_with_borrow,
    };
    pub use super::logic::word::{
        and, exclusive_or, not, or, shift_arithmetic_right, shift_left, shift_right, test,
    };
}
