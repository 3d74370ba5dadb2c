use crate::cpu::Cpu;
use crate::error::Result;
use sim86_instruction::{OperandSize, RegisterAccess};
use tracing::warn;

/// Uniform read/write access to an instruction operand, whether it lives in the register file
/// or in memory.  Values are always carried in a `u16`; byte sized sinks only use the low byte.
pub trait OperandSink {
    fn read(&self, cpu: &Cpu) -> Result<u16>;
    fn write(&self, cpu: &mut Cpu, value: u16) -> Result<()>;
}

impl OperandSink for RegisterAccess {
    #[inline(always)]
    fn read(&self, cpu: &Cpu) -> Result<u16> {
        cpu.state.read(*self)
    }

    #[inline(always)]
    fn write(&self, cpu: &mut Cpu, value: u16) -> Result<()> {
        cpu.state.write(*self, value)
    }
}

/// One or two bytes of memory at a resolved physical address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryCell {
    pub address: u32,
    pub operand_size: OperandSize,
}

impl OperandSink for MemoryCell {
    fn read(&self, cpu: &Cpu) -> Result<u16> {
        cpu.memory.read_n(self.address, self.operand_size)
    }

    fn write(&self, cpu: &mut Cpu, value: u16) -> Result<()> {
        if (self.address as usize) < cpu.code_end() {
            warn!("Writing into loaded code! ({:05X})", self.address);
        }

        cpu.memory.write_n(self.address, value, self.operand_size)
    }
}

/// An operand resolved against the current machine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Register(RegisterAccess),
    Memory(MemoryCell),
}

impl OperandSink for Location {
    fn read(&self, cpu: &Cpu) -> Result<u16> {
        match self {
            Location::Register(register) => register.read(cpu),
            Location::Memory(cell) => cell.read(cpu),
        }
    }

    fn write(&self, cpu: &mut Cpu, value: u16) -> Result<()> {
        match self {
            Location::Register(register) => register.write(cpu, value),
            Location::Memory(cell) => cell.write(cpu, value),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Memory;
    use sim86_instruction::Register;

    #[test]
    fn registers_and_memory_share_one_interface() {
        let mut cpu = Cpu::new(Memory::new(0x100, 8).unwrap());

        let sinks = [
            Location::Register(RegisterAccess::high(Register::B)),
            Location::Memory(MemoryCell {
                address: 0x10,
                operand_size: OperandSize::Byte,
            }),
        ];

        for sink in sinks {
            sink.write(&mut cpu, 0x1234).unwrap();
            assert_eq!(Ok(0x34), sink.read(&cpu));
        }

        assert_eq!(0x3400, cpu.state.register(Register::B));
        assert_eq!(Ok(0x34), cpu.memory.read_u8(0x10));
    }

    #[test]
    fn word_cells() {
        let mut cpu = Cpu::new(Memory::new(0x100, 8).unwrap());
        let cell = MemoryCell {
            address: 0xFF,
            operand_size: OperandSize::Word,
        };
        cell.write(&mut cpu, 0xABCD).unwrap();
        assert_eq!(Ok(0xABCD), cell.read(&cpu));
        assert_eq!(Ok(0xAB), cpu.memory.read_u8(0x00));
    }
}
