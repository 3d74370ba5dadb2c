use crate::error::{Error, Result};
use sim86_instruction::OperandSize;

pub const DEFAULT_MEMORY_SIZE: usize = 1 << 20;
pub const DEFAULT_ADDRESS_BITS: u32 = 20;

/// Flat byte addressable memory.  Every address is masked to `address_bits` before it is used,
/// so addresses wrap around at the top of the address space.
///
/// The backing buffer may be smaller than the address space.  Masked addresses that land past
/// the end of the buffer fail with [Error::OutOfBoundsMemoryAccess].
pub struct Memory {
    data: Vec<u8>,
    mask: u32,
}

impl Memory {
    pub fn new(size: usize, address_bits: u32) -> Result<Self> {
        if size == 0 || !(1..=20).contains(&address_bits) {
            return Err(Error::InvalidMemoryConfiguration { size, address_bits });
        }

        Ok(Self {
            data: vec![0; size],
            mask: (1 << address_bits) - 1,
        })
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn index(&self, address: u32) -> Result<usize> {
        let address = address & self.mask;
        if (address as usize) < self.data.len() {
            Ok(address as usize)
        } else {
            Err(Error::OutOfBoundsMemoryAccess { address })
        }
    }

    pub fn read_u8(&self, address: u32) -> Result<u8> {
        Ok(self.data[self.index(address)?])
    }

    pub fn read_u16(&self, address: u32) -> Result<u16> {
        let lo = self.read_u8(address)?;
        let hi = self.read_u8(address.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    pub fn read_n(&self, address: u32, operand_size: OperandSize) -> Result<u16> {
        match operand_size {
            OperandSize::Byte => self.read_u8(address).map(u16::from),
            OperandSize::Word => self.read_u16(address),
        }
    }

    pub fn write_u8(&mut self, address: u32, value: u8) -> Result<()> {
        let index = self.index(address)?;
        self.data[index] = value;
        Ok(())
    }

    pub fn write_u16(&mut self, address: u32, value: u16) -> Result<()> {
        let [lo, hi] = value.to_le_bytes();
        self.write_u8(address, lo)?;
        self.write_u8(address.wrapping_add(1), hi)
    }

    /// Write the low `operand_size` bytes of `value`.
    pub fn write_n(&mut self, address: u32, value: u16, operand_size: OperandSize) -> Result<()> {
        match operand_size {
            OperandSize::Byte => self.write_u8(address, value as u8),
            OperandSize::Word => self.write_u16(address, value),
        }
    }

    /// Copy `bytes` into memory starting at physical address 0.
    pub fn load(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.data.len() {
            return Err(Error::ProgramTooLarge {
                size: bytes.len(),
                capacity: self.data.len(),
            });
        }

        self.data[..bytes.len()].copy_from_slice(bytes);

        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            data: vec![0; DEFAULT_MEMORY_SIZE],
            mask: (1 << DEFAULT_ADDRESS_BITS) - 1,
        }
    }
}
