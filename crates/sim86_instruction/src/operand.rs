use crate::{Register, RegisterAccess};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandSize {
    Byte,
    Word,
}

impl OperandSize {
    pub fn from_wide_bit(wide: bool) -> Self {
        if wide {
            OperandSize::Word
        } else {
            OperandSize::Byte
        }
    }

    pub fn is_wide(self) -> bool {
        self == OperandSize::Word
    }

    pub fn byte_count(self) -> u8 {
        match self {
            OperandSize::Byte => 1,
            OperandSize::Word => 2,
        }
    }

    pub fn bits(self) -> u32 {
        self.byte_count() as u32 * 8
    }

    pub fn mask(self) -> u16 {
        match self {
            OperandSize::Byte => 0x00FF,
            OperandSize::Word => 0xFFFF,
        }
    }

    pub fn sign_bit(self) -> u16 {
        match self {
            OperandSize::Byte => 0x0080,
            OperandSize::Word => 0x8000,
        }
    }
}

/// The eight base/index formulas selectable by the r/m field of a mod reg r/m byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    BxSi,
    BxDi,
    BpSi,
    BpDi,
    Si,
    Di,
    Bp,
    Bx,
}

impl AddressingMode {
    pub fn terms(self) -> [Option<AddressTerm>; 2] {
        use AddressingMode::*;

        let term = |register| Some(AddressTerm::new(register));

        match self {
            BxSi => [term(Register::B), term(Register::SI)],
            BxDi => [term(Register::B), term(Register::DI)],
            BpSi => [term(Register::BP), term(Register::SI)],
            BpDi => [term(Register::BP), term(Register::DI)],
            Si => [term(Register::SI), None],
            Di => [term(Register::DI), None],
            Bp => [term(Register::BP), None],
            Bx => [term(Register::B), None],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressTerm {
    pub register: RegisterAccess,
    pub scale: i32,
}

impl AddressTerm {
    pub fn new(register: Register) -> Self {
        Self {
            register: RegisterAccess::word(register),
            scale: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Displacement {
    None,
    Byte(i8),
    Word(i16),
}

impl Displacement {
    /// The displacement sign-extended to 32 bits.
    pub fn value(self) -> i32 {
        match self {
            Displacement::None => 0,
            Displacement::Byte(offset) => offset as i32,
            Displacement::Word(offset) => offset as i32,
        }
    }
}

/// A memory operand: up to two scaled register terms plus a displacement, with an optional
/// explicit segment.  An expression without terms is a direct address and its displacement
/// holds the raw 16-bit address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressExpression {
    pub terms: [Option<AddressTerm>; 2],
    pub displacement: Displacement,
    pub segment: Option<Register>,
}

impl AddressExpression {
    pub fn indirect(addressing_mode: AddressingMode, displacement: Displacement) -> Self {
        Self {
            terms: addressing_mode.terms(),
            displacement,
            segment: None,
        }
    }

    pub fn direct(address: u16) -> Self {
        Self {
            terms: [None, None],
            displacement: Displacement::Word(address as i16),
            segment: None,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.terms.iter().all(Option::is_none)
    }

    /// The register of the first term, which decides the default segment.
    pub fn base(&self) -> Option<Register> {
        self.terms[0].map(|term| term.register.register)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Immediate {
    pub value: i32,
    pub relative_jump: bool,
}

impl Immediate {
    pub fn new(value: i32) -> Self {
        Self {
            value,
            relative_jump: false,
        }
    }

    pub fn jump(displacement: i8) -> Self {
        Self {
            value: displacement as i32,
            relative_jump: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    None,
    Register(RegisterAccess),
    Memory(AddressExpression),
    Immediate(Immediate),
}

impl Operand {
    pub fn is_none(&self) -> bool {
        matches!(self, Operand::None)
    }

    pub fn is_register(&self) -> bool {
        matches!(self, Operand::Register(_))
    }
}

impl From<RegisterAccess> for Operand {
    fn from(register: RegisterAccess) -> Self {
        Operand::Register(register)
    }
}

impl From<AddressExpression> for Operand {
    fn from(expression: AddressExpression) -> Self {
        Operand::Memory(expression)
    }
}

impl From<Immediate> for Operand {
    fn from(immediate: Immediate) -> Self {
        Operand::Immediate(immediate)
    }
}
