use crate::OperandSize;

/// The 16-bit slots of the register file, in storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    A,
    B,
    C,
    D,
    SP,
    BP,
    SI,
    DI,
    ES,
    CS,
    SS,
    DS,
    IP,
    FLAGS,
}

impl Register {
    pub const COUNT: usize = 14;

    pub const ALL: [Register; Register::COUNT] = [
        Register::A,
        Register::B,
        Register::C,
        Register::D,
        Register::SP,
        Register::BP,
        Register::SI,
        Register::DI,
        Register::ES,
        Register::CS,
        Register::SS,
        Register::DS,
        Register::IP,
        Register::FLAGS,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Only the four general purpose registers have independently addressable halves.
    pub fn has_byte_halves(self) -> bool {
        matches!(self, Register::A | Register::B | Register::C | Register::D)
    }

    /// Name of the full 16-bit slot.
    pub fn name(self) -> &'static str {
        use Register::*;

        match self {
            A => "ax",
            B => "bx",
            C => "cx",
            D => "dx",
            SP => "sp",
            BP => "bp",
            SI => "si",
            DI => "di",
            ES => "es",
            CS => "cs",
            SS => "ss",
            DS => "ds",
            IP => "ip",
            FLAGS => "flags",
        }
    }
}

/// Selects a 1 or 2 byte window inside one of the 16-bit register slots.
///
/// `offset` 0 is the low half (`al`), 1 is the high half (`ah`).  A word access always has an
/// offset of 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegisterAccess {
    pub register: Register,
    pub offset: u8,
    pub width: u8,
}

impl RegisterAccess {
    pub const fn new(register: Register, offset: u8, width: u8) -> Self {
        Self {
            register,
            offset,
            width,
        }
    }

    pub const fn word(register: Register) -> Self {
        Self::new(register, 0, 2)
    }

    pub const fn low(register: Register) -> Self {
        Self::new(register, 0, 1)
    }

    pub const fn high(register: Register) -> Self {
        Self::new(register, 1, 1)
    }

    /// Whether the window fits inside a 16-bit slot.
    pub fn is_valid(&self) -> bool {
        matches!(self.width, 1 | 2)
            && self.offset <= 1
            && self.offset + self.width <= 2
            && (self.width == 2 || self.register.has_byte_halves())
    }

    pub fn operand_size(&self) -> OperandSize {
        if self.width == 1 {
            OperandSize::Byte
        } else {
            OperandSize::Word
        }
    }

    pub fn name(&self) -> &'static str {
        use Register::*;

        match (self.register, self.offset, self.width) {
            (A, 0, 1) => "al",
            (A, 1, 1) => "ah",
            (B, 0, 1) => "bl",
            (B, 1, 1) => "bh",
            (C, 0, 1) => "cl",
            (C, 1, 1) => "ch",
            (D, 0, 1) => "dl",
            (D, 1, 1) => "dh",
            (register, _, _) => register.name(),
        }
    }
}

impl std::fmt::Display for RegisterAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
