use crate::cpu::Flags;

macro_rules! logic {
    ($t:ident, $signed:ident) => {
        fn bitwise(result: $t, flags: &mut Flags) -> $t {
            flags.remove(Flags::OVERFLOW | Flags::CARRY);
            flags_from_result(flags, result);
            result
        }

        pub fn and(destination: $t, source: $t, flags: &mut Flags) -> Option<$t> {
            Some(bitwise(destination & source, flags))
        }

        pub fn or(destination: $t, source: $t, flags: &mut Flags) -> Option<$t> {
            Some(bitwise(destination | source, flags))
        }

        pub fn exclusive_or(destination: $t, source: $t, flags: &mut Flags) -> Option<$t> {
            Some(bitwise(destination ^ source, flags))
        }

        pub fn test(destination: $t, source: $t, flags: &mut Flags) -> Option<$t> {
            let _ = bitwise(destination & source, flags);
            None
        }

        pub fn not(destination: $t) -> Option<$t> {
            Some(!destination)
        }

        // Shifts only touch OVERFLOW: it is cleared when the sign bit survives the shift and
        // keeps its previous value otherwise.
        fn shift_overflow(value: $t, result: $t, flags: &mut Flags) {
            if value.most_significant_bit() == result.most_significant_bit() {
                flags.remove(Flags::OVERFLOW);
            }
        }

        pub fn shift_left(value: $t, by: u8, flags: &mut Flags) -> Option<$t> {
            let result = value.checked_shl(by as u32).unwrap_or(0);
            shift_overflow(value, result, flags);
            Some(result)
        }

        pub fn shift_right(value: $t, by: u8, flags: &mut Flags) -> Option<$t> {
            let result = value.checked_shr(by as u32).unwrap_or(0);
            shift_overflow(value, result, flags);
            Some(result)
        }

        pub fn shift_arithmetic_right(value: $t, by: u8, flags: &mut Flags) -> Option<$t> {
            let by = (by as u32).min(<$t>::BITS - 1);
            let result = ((value as $signed) >> by) as $t;
            shift_overflow(value, result, flags);
            Some(result)
        }
    };
}

pub mod byte {
    use super::*;
    use crate::cpu::executor::operations::{byte::flags_from_result, SignificantBit};

    logic!(u8, i8);

}

pub mod word {
    use super::*;
    use crate::cpu::executor::operations::{word::flags_from_result, SignificantBit};

    logic!(u16, i16);

}
