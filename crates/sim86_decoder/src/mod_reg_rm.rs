use crate::cursor::{ByteCursor, ReadExt};
use crate::errors::Result;
use sim86_instruction::{
    AddressExpression, AddressingMode, Displacement, Operand, OperandSize, Register,
    RegisterAccess,
};

const BYTE_REGISTERS: [RegisterAccess; 8] = [
    RegisterAccess::low(Register::A),
    RegisterAccess::low(Register::C),
    RegisterAccess::low(Register::D),
    RegisterAccess::low(Register::B),
    RegisterAccess::high(Register::A),
    RegisterAccess::high(Register::C),
    RegisterAccess::high(Register::D),
    RegisterAccess::high(Register::B),
];

const WORD_REGISTERS: [RegisterAccess; 8] = [
    RegisterAccess::word(Register::A),
    RegisterAccess::word(Register::C),
    RegisterAccess::word(Register::D),
    RegisterAccess::word(Register::B),
    RegisterAccess::word(Register::SP),
    RegisterAccess::word(Register::BP),
    RegisterAccess::word(Register::SI),
    RegisterAccess::word(Register::DI),
];

const SEGMENT_REGISTERS: [Register; 4] = [Register::ES, Register::CS, Register::SS, Register::DS];

const ADDRESSING_MODES: [AddressingMode; 8] = [
    AddressingMode::BxSi,
    AddressingMode::BxDi,
    AddressingMode::BpSi,
    AddressingMode::BpDi,
    AddressingMode::Si,
    AddressingMode::Di,
    AddressingMode::Bp,
    AddressingMode::Bx,
];

/// Look up a general purpose register from a 3-bit encoding.
pub(crate) fn register_from_encoding(encoding: u8, operand_size: OperandSize) -> RegisterAccess {
    let index = (encoding & 0b111) as usize;
    match operand_size {
        OperandSize::Byte => BYTE_REGISTERS[index],
        OperandSize::Word => WORD_REGISTERS[index],
    }
}

/// Look up a segment register from a 2-bit encoding.
pub(crate) fn segment_from_encoding(encoding: u8) -> Register {
    SEGMENT_REGISTERS[(encoding & 0b11) as usize]
}

fn addressing_mode_from_encoding(encoding: u8) -> AddressingMode {
    ADDRESSING_MODES[(encoding & 0b111) as usize]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterOrMemory {
    Direct(u16),
    Indirect(AddressingMode),
    DisplacementByte(AddressingMode, i8),
    DisplacementWord(AddressingMode, i16),
    Register(u8),
}

impl RegisterOrMemory {
    pub(crate) fn try_from_modrm(mod_rm_byte: u8, cursor: &mut ByteCursor) -> Result<Self> {
        let mode = mod_rm_byte >> 6;
        let rm = mod_rm_byte & 0b111;

        Ok(match mode {
            0b00 => match rm {
                0b110 => RegisterOrMemory::Direct(cursor.read_u16()?),
                _ => RegisterOrMemory::Indirect(addressing_mode_from_encoding(rm)),
            },

            0b01 => RegisterOrMemory::DisplacementByte(
                addressing_mode_from_encoding(rm),
                cursor.read_u8()? as i8,
            ),

            0b10 => RegisterOrMemory::DisplacementWord(
                addressing_mode_from_encoding(rm),
                cursor.read_u16()? as i16,
            ),

            _ => RegisterOrMemory::Register(rm),
        })
    }

    pub fn into_operand(self, operand_size: OperandSize) -> Operand {
        match self {
            RegisterOrMemory::Direct(address) => AddressExpression::direct(address).into(),
            RegisterOrMemory::Indirect(addressing_mode) => {
                AddressExpression::indirect(addressing_mode, Displacement::None).into()
            }
            RegisterOrMemory::DisplacementByte(addressing_mode, displacement) => {
                AddressExpression::indirect(addressing_mode, Displacement::Byte(displacement))
                    .into()
            }
            RegisterOrMemory::DisplacementWord(addressing_mode, displacement) => {
                AddressExpression::indirect(addressing_mode, Displacement::Word(displacement))
                    .into()
            }
            RegisterOrMemory::Register(encoding) => {
                register_from_encoding(encoding, operand_size).into()
            }
        }
    }
}

/// The second byte of most instruction forms.  `register` is the raw 3-bit reg field, which is
/// either a register encoding or an op code extension depending on the instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModRegRM {
    pub register: u8,
    pub register_or_memory: RegisterOrMemory,
}

impl ModRegRM {
    pub(crate) fn try_from_byte(mod_rm_byte: u8, cursor: &mut ByteCursor) -> Result<Self> {
        let register = (mod_rm_byte >> 3) & 0b111;
        let register_or_memory = RegisterOrMemory::try_from_modrm(mod_rm_byte, cursor)?;

        Ok(ModRegRM {
            register,
            register_or_memory,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! test_reg_or_mem {
        ($mod_reg_rm_byte:expr,[$($byte:expr),*],$expected:expr) => {{
            let data: &[u8] = &[$($byte),*];
            let mut cursor = ByteCursor::new(data, 0);
            assert_eq!(
                Ok($expected),
                RegisterOrMemory::try_from_modrm($mod_reg_rm_byte, &mut cursor)
            );
            assert_eq!(data.len(), cursor.consumed());
        }};
    }

    #[test]
    fn indirect() {
        test_reg_or_mem!(
            0b00_000_000,
            [],
            RegisterOrMemory::Indirect(AddressingMode::BxSi)
        );
        test_reg_or_mem!(
            0b00_000_011,
            [],
            RegisterOrMemory::Indirect(AddressingMode::BpDi)
        );
        test_reg_or_mem!(
            0b00_000_111,
            [],
            RegisterOrMemory::Indirect(AddressingMode::Bx)
        );
    }

    #[test]
    fn direct_address_replaces_bp() {
        test_reg_or_mem!(0b00_000_110, [0x12, 0x34], RegisterOrMemory::Direct(0x3412));
        test_reg_or_mem!(
            0b01_000_110,
            [0x00],
            RegisterOrMemory::DisplacementByte(AddressingMode::Bp, 0)
        );
    }

    #[test]
    fn displacements() {
        test_reg_or_mem!(
            0b01_000_001,
            [0xDB],
            RegisterOrMemory::DisplacementByte(AddressingMode::BxDi, -37)
        );
        test_reg_or_mem!(
            0b10_000_100,
            [0x12, 0x34],
            RegisterOrMemory::DisplacementWord(AddressingMode::Si, 0x3412)
        );
        test_reg_or_mem!(
            0b10_000_101,
            [0x00, 0x80],
            RegisterOrMemory::DisplacementWord(AddressingMode::Di, i16::MIN)
        );
    }

    #[test]
    fn registers() {
        test_reg_or_mem!(0b11_000_000, [], RegisterOrMemory::Register(0b000));
        test_reg_or_mem!(0b11_000_111, [], RegisterOrMemory::Register(0b111));
    }

    #[test]
    fn register_tables() {
        assert_eq!(
            RegisterAccess::high(Register::A),
            register_from_encoding(0b100, OperandSize::Byte)
        );
        assert_eq!(
            RegisterAccess::word(Register::SP),
            register_from_encoding(0b100, OperandSize::Word)
        );
        assert_eq!(
            RegisterAccess::word(Register::B),
            register_from_encoding(0b011, OperandSize::Word)
        );
        assert_eq!(Register::SS, segment_from_encoding(0b10));
    }

    #[test]
    fn fields_of_the_mod_reg_rm_byte() {
        let data = [0b01_011_001, 0xFE];
        let mut cursor = ByteCursor::new(&data, 0);
        assert_eq!(
            Ok(ModRegRM {
                register: 0b011,
                register_or_memory: RegisterOrMemory::DisplacementByte(AddressingMode::BxDi, -2),
            }),
            cursor.read_mrrm()
        );
        assert_eq!(2, cursor.consumed());
    }
}
