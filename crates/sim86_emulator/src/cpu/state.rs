use crate::error::{Error, Result};
use bitflags::bitflags;
use sim86_instruction::{Register, RegisterAccess};
use std::fmt::{Display, Formatter};

bitflags! {
    pub struct Flags : u16 {
        const CARRY = 1 << 0;
        const PARITY = 1 << 2;
        const AUX_CARRY = 1 << 4;
        const ZERO = 1 << 6;
        const SIGN = 1 << 7;
        const TRAP = 1 << 8;
        const INTERRUPT = 1 << 9;
        const DIRECTION = 1 << 10;
        const OVERFLOW = 1 << 11;
    }
}

const FLAG_LETTERS: [(Flags, char); 9] = [
    (Flags::CARRY, 'C'),
    (Flags::PARITY, 'P'),
    (Flags::AUX_CARRY, 'A'),
    (Flags::ZERO, 'Z'),
    (Flags::SIGN, 'S'),
    (Flags::TRAP, 'T'),
    (Flags::INTERRUPT, 'I'),
    (Flags::DIRECTION, 'D'),
    (Flags::OVERFLOW, 'O'),
];

impl Display for Flags {
    /// Letters of the set flags, e.g. `CPZ`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (flag, letter) in FLAG_LETTERS {
            if self.contains(flag) {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

/// The register file: one 16-bit slot per [Register], in storage order.  The general purpose
/// registers expose their halves through byte sized [RegisterAccess]es.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct State {
    slots: [u16; Register::COUNT],
}

impl State {
    pub fn read(&self, access: RegisterAccess) -> Result<u16> {
        let slot = self.slots[Self::checked(access)?.register.index()];

        Ok(match access.width {
            1 => (slot >> (access.offset * 8)) & 0xFF,
            _ => slot,
        })
    }

    pub fn write(&mut self, access: RegisterAccess, value: u16) -> Result<()> {
        let slot = &mut self.slots[Self::checked(access)?.register.index()];

        match access.width {
            1 => {
                let shift = access.offset * 8;
                *slot = (*slot & !(0xFF << shift)) | ((value & 0xFF) << shift);
            }
            _ => *slot = value,
        }

        Ok(())
    }

    fn checked(access: RegisterAccess) -> Result<RegisterAccess> {
        if access.is_valid() {
            Ok(access)
        } else {
            Err(Error::InvalidRegisterAccess {
                register: access.register,
                offset: access.offset,
                width: access.width,
            })
        }
    }

    /// The full 16-bit value of a slot.
    #[inline(always)]
    pub fn register(&self, register: Register) -> u16 {
        self.slots[register.index()]
    }

    #[inline(always)]
    pub fn set_register(&mut self, register: Register, value: u16) {
        self.slots[register.index()] = value;
    }

    pub fn ip(&self) -> u16 {
        self.register(Register::IP)
    }

    pub fn set_ip(&mut self, ip: u16) {
        self.set_register(Register::IP, ip);
    }

    pub fn flags(&self) -> Flags {
        Flags::from_bits_truncate(self.register(Register::FLAGS))
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.set_register(Register::FLAGS, flags.bits());
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.set_flags(flags);
        self
    }

    /// Slots that differ between `self` and `other`, excluding the flags, as
    /// `(register, self value, other value)`.
    pub fn changes<'a>(
        &'a self,
        other: &'a State,
    ) -> impl Iterator<Item = (Register, u16, u16)> + 'a {
        Register::ALL
            .into_iter()
            .filter(|register| *register != Register::FLAGS)
            .map(move |register| (register, self.register(register), other.register(register)))
            .filter(|(_, before, after)| before != after)
    }
}

impl Display for State {
    /// Every non-zero slot followed by the flags.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for register in Register::ALL {
            if register == Register::FLAGS {
                continue;
            }

            let value = self.register(register);
            if value != 0 {
                writeln!(f, "{:>8}: {:#06x} ({})", register.name(), value, value)?;
            }
        }

        write!(f, "{:>8}: {}", "flags", self.flags())
    }
}
