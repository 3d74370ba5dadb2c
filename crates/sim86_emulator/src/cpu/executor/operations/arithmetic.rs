use crate::cpu::Flags;

macro_rules! arithmetic {
    ($t:ident, $signed:ident) => {
        fn add_with_carry_in(destination: $t, source: $t, carry_in: bool, flags: &mut Flags) -> $t {
            let wide = destination as u32 + source as u32 + carry_in as u32;
            let result = wide as $t;

            flags.set(Flags::CARRY, wide > <$t>::MAX as u32);
            flags.set(Flags::AUX_CARRY, (destination ^ source ^ result) & 0x10 != 0);
            flags.set(
                Flags::OVERFLOW,
                ((destination ^ result) & (source ^ result)).most_significant_bit(),
            );
            flags_from_result(flags, result);

            result
        }

        fn subtract_with_borrow_in(
            destination: $t,
            source: $t,
            borrow_in: bool,
            flags: &mut Flags,
        ) -> $t {
            let subtrahend = source as u32 + borrow_in as u32;
            let result = (destination as u32).wrapping_sub(subtrahend) as $t;

            flags.set(Flags::CARRY, (destination as u32) < subtrahend);
            flags.set(Flags::AUX_CARRY, (destination ^ source ^ result) & 0x10 != 0);
            flags.set(
                Flags::OVERFLOW,
                ((destination ^ source) & (destination ^ result)).most_significant_bit(),
            );
            flags_from_result(flags, result);

            result
        }

        pub fn add(destination: $t, source: $t, flags: &mut Flags) -> Option<$t> {
            Some(add_with_carry_in(destination, source, false, flags))
        }

        pub fn add_with_carry(destination: $t, source: $t, flags: &mut Flags) -> Option<$t> {
            let carry_in = flags.contains(Flags::CARRY);
            Some(add_with_carry_in(destination, source, carry_in, flags))
        }

        pub fn subtract(destination: $t, source: $t, flags: &mut Flags) -> Option<$t> {
            Some(subtract_with_borrow_in(destination, source, false, flags))
        }

        pub fn subtract_with_borrow(
            destination: $t,
            source: $t,
            flags: &mut Flags,
        ) -> Option<$t> {
            let borrow_in = flags.contains(Flags::CARRY);
            Some(subtract_with_borrow_in(
                destination,
                source,
                borrow_in,
                flags,
            ))
        }

        pub fn compare(destination: $t, source: $t, flags: &mut Flags) -> Option<$t> {
            let _ = subtract_with_borrow_in(destination, source, false, flags);
            None
        }

        pub fn increment(destination: $t, flags: &mut Flags) -> Option<$t> {
            let carry = flags.contains(Flags::CARRY);
            let result = add_with_carry_in(destination, 1, false, flags);
            flags.set(Flags::CARRY, carry);
            Some(result)
        }

        pub fn decrement(destination: $t, flags: &mut Flags) -> Option<$t> {
            let carry = flags.contains(Flags::CARRY);
            let result = subtract_with_borrow_in(destination, 1, false, flags);
            flags.set(Flags::CARRY, carry);
            Some(result)
        }

        pub fn negate(destination: $t, flags: &mut Flags) -> Option<$t> {
            let result = subtract_with_borrow_in(0, destination, false, flags);
            flags.set(Flags::CARRY, destination != 0);
            Some(result)
        }

        /// Unsigned product as `(low, high)` halves.
        pub fn multiply(destination: $t, source: $t, flags: &mut Flags) -> ($t, $t) {
            let wide = destination as u32 * source as u32;
            let low = wide as $t;
            let high = (wide >> <$t>::BITS) as $t;

            flags.set(Flags::CARRY | Flags::OVERFLOW, high != 0);

            (low, high)
        }

        /// Signed product as `(low, high)` halves.
        pub fn signed_multiply(destination: $t, source: $t, flags: &mut Flags) -> ($t, $t) {
            let wide = destination as $signed as i32 * source as $signed as i32;
            let low = wide as $t;
            let high = (wide >> <$t>::BITS) as $t;

            // The product fits when the high half is only the sign extension of the low half.
            flags.set(Flags::CARRY | Flags::OVERFLOW, wide != low as $signed as i32);

            (low, high)
        }
    };
}

pub mod byte {
    use super::*;
    use crate::cpu::executor::operations::{byte::flags_from_result, SignificantBit};

    arithmetic!(u8, i8);

}

pub mod word {
    use super::*;
    use crate::cpu::executor::operations::{word::flags_from_result, SignificantBit};

    arithmetic!(u16, i16);

}
