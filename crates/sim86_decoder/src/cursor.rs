use crate::mod_reg_rm::ModRegRM;
use crate::{DecodeError, Result};
use sim86_instruction::{Displacement, Immediate, OperandSize};

/// Sequential read position over a byte buffer.  Every read past the end of the buffer fails with
/// [DecodeError::TruncatedInstruction] for the instruction that started at `start`.
pub struct ByteCursor<'a> {
    data: &'a [u8],
    start: usize,
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            start: offset,
            position: offset,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes read since the cursor was created.
    pub fn consumed(&self) -> usize {
        self.position - self.start
    }
}

impl Iterator for ByteCursor<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        let byte = self.data.get(self.position)?;
        self.position += 1;
        Some(*byte)
    }
}

pub(crate) trait ReadExt {
    fn read_u8(&mut self) -> Result<u8>;

    fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes([self.read_u8()?, self.read_u8()?]))
    }

    fn read_mrrm(&mut self) -> Result<ModRegRM>;

    fn read_immediate(&mut self, operand_size: OperandSize, sign_extend: bool) -> Result<Immediate>;

    fn read_displacement(&mut self, operand_size: OperandSize) -> Result<Displacement>;
}

impl ReadExt for ByteCursor<'_> {
    fn read_u8(&mut self) -> Result<u8> {
        let start = self.start;
        self.next()
            .ok_or(DecodeError::TruncatedInstruction { offset: start })
    }

    fn read_mrrm(&mut self) -> Result<ModRegRM> {
        let mrrm_byte = self.read_u8()?;
        ModRegRM::try_from_byte(mrrm_byte, self)
    }

    fn read_immediate(&mut self, operand_size: OperandSize, sign_extend: bool) -> Result<Immediate> {
        // The sign has to be applied while the value is still 8 bits wide.
        let value = match (operand_size, sign_extend) {
            (OperandSize::Byte, _) => self.read_u8()? as i32,
            (OperandSize::Word, true) => self.read_u8()? as i8 as i32,
            (OperandSize::Word, false) => self.read_u16()? as i32,
        };

        Ok(Immediate::new(value))
    }

    fn read_displacement(&mut self, operand_size: OperandSize) -> Result<Displacement> {
        Ok(match operand_size {
            OperandSize::Byte => Displacement::Byte(self.read_u8()? as i8),
            OperandSize::Word => Displacement::Word(self.read_u16()? as i16),
        })
    }
}
