use crate::cursor::{ByteCursor, ReadExt};
use crate::errors::Result;
use crate::mod_reg_rm::{register_from_encoding, segment_from_encoding, ModRegRM};
use crate::DecodeError;
use sim86_instruction::{
    AddressExpression, Immediate, Instruction, Operand, OperandSize, Operation, Register,
    RegisterAccess,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Direction {
    Detect,
    RegMemFirst,
}

pub(crate) trait OpCodeExt {
    fn operand_size(self) -> OperandSize;
}

impl OpCodeExt for u8 {
    /// The `w` bit in the lowest position of most op codes.
    #[inline]
    fn operand_size(self) -> OperandSize {
        OperandSize::from_wide_bit(self & 0b1 == 1)
    }
}

/// Build the instruction with every byte read so far, prefixes included, as its size.
fn finish(
    operation: Operation,
    operands: [Operand; 2],
    operand_size: OperandSize,
    cursor: &ByteCursor,
) -> Instruction {
    Instruction::new(operation, operands, operand_size, cursor.consumed())
}

pub(crate) fn unknown_op_code(op_code: u8, cursor: &ByteCursor) -> DecodeError {
    DecodeError::UnknownOpcode {
        op_code,
        offset: cursor.start(),
    }
}

// x x x x x x d w | mod reg r/m
pub(crate) fn register_or_memory_and_register(
    operation: Operation,
    direction: Direction,
    op_code: u8,
    cursor: &mut ByteCursor,
) -> Result<Instruction> {
    let reg_first = match direction {
        Direction::Detect => (op_code >> 1) & 1 == 1,
        Direction::RegMemFirst => false,
    };
    let operand_size = op_code.operand_size();

    let mrrm = cursor.read_mrrm()?;

    let reg = register_from_encoding(mrrm.register, operand_size).into();
    let reg_mem = mrrm.register_or_memory.into_operand(operand_size);

    Ok(finish(
        operation,
        if reg_first {
            [reg, reg_mem]
        } else {
            [reg_mem, reg]
        },
        operand_size,
        cursor,
    ))
}

// x x x x x x d x | mod 0 sr r/m
pub(crate) fn register_or_memory_and_segment(
    op_code: u8,
    cursor: &mut ByteCursor,
) -> Result<Instruction> {
    let mrrm = cursor.read_mrrm()?;
    if mrrm.register & 0b100 != 0 {
        return Err(unknown_op_code(op_code, cursor));
    }

    let segment = RegisterAccess::word(segment_from_encoding(mrrm.register)).into();
    let reg_mem = mrrm.register_or_memory.into_operand(OperandSize::Word);

    Ok(finish(
        Operation::MOV,
        match (op_code >> 1) & 1 {
            0 => [reg_mem, segment],
            _ => [segment, reg_mem],
        },
        OperandSize::Word,
        cursor,
    ))
}

// x x x x x x s w | mod op r/m | data | data if s:w = 0:1
pub(crate) fn immediate_to_register_or_memory(
    operation: Operation,
    mrrm: ModRegRM,
    op_code: u8,
    sign_extend: bool,
    cursor: &mut ByteCursor,
) -> Result<Instruction> {
    let operand_size = op_code.operand_size();

    let destination = mrrm.register_or_memory.into_operand(operand_size);
    let source = cursor.read_immediate(operand_size, sign_extend)?.into();

    Ok(finish(
        operation,
        [destination, source],
        operand_size,
        cursor,
    ))
}

// x x x x x x x w | data | data if w = 1
pub(crate) fn immediate_to_accumulator(
    operation: Operation,
    op_code: u8,
    cursor: &mut ByteCursor,
) -> Result<Instruction> {
    let operand_size = op_code.operand_size();

    let accumulator = register_from_encoding(0b000, operand_size).into();
    let immediate = cursor.read_immediate(operand_size, false)?.into();

    Ok(finish(
        operation,
        [accumulator, immediate],
        operand_size,
        cursor,
    ))
}

// x x x x w reg | data | data if w = 1
pub(crate) fn immediate_to_register(op_code: u8, cursor: &mut ByteCursor) -> Result<Instruction> {
    let operand_size = OperandSize::from_wide_bit((op_code >> 3) & 1 == 1);

    let register = register_from_encoding(op_code, operand_size).into();
    let immediate = cursor.read_immediate(operand_size, false)?.into();

    Ok(finish(
        Operation::MOV,
        [register, immediate],
        operand_size,
        cursor,
    ))
}

// x x x x x x d w | addr-lo | addr-hi
pub(crate) fn memory_and_accumulator(op_code: u8, cursor: &mut ByteCursor) -> Result<Instruction> {
    let operand_size = op_code.operand_size();

    let accumulator = register_from_encoding(0b000, operand_size).into();
    let memory = AddressExpression::direct(cursor.read_u16()?).into();

    Ok(finish(
        Operation::MOV,
        match (op_code >> 1) & 1 {
            0 => [accumulator, memory],
            _ => [memory, accumulator],
        },
        operand_size,
        cursor,
    ))
}

// x x x x x x x w | mod op r/m
pub(crate) fn register_or_memory(
    operation: Operation,
    mrrm: ModRegRM,
    op_code: u8,
    cursor: &mut ByteCursor,
) -> Instruction {
    let operand_size = op_code.operand_size();
    let destination = mrrm.register_or_memory.into_operand(operand_size);

    finish(operation, [destination, Operand::None], operand_size, cursor)
}

// x x x x x x v w | mod op r/m
pub(crate) fn register_or_memory_by_count(
    operation: Operation,
    mrrm: ModRegRM,
    op_code: u8,
    cursor: &mut ByteCursor,
) -> Instruction {
    let operand_size = op_code.operand_size();
    let destination = mrrm.register_or_memory.into_operand(operand_size);
    let count = match (op_code >> 1) & 1 {
        0 => Immediate::new(1).into(),
        _ => RegisterAccess::low(Register::C).into(),
    };

    finish(operation, [destination, count], operand_size, cursor)
}

// x x x x x reg
pub(crate) fn register16(operation: Operation, op_code: u8, cursor: &ByteCursor) -> Instruction {
    let register = register_from_encoding(op_code, OperandSize::Word).into();

    finish(
        operation,
        [register, Operand::None],
        OperandSize::Word,
        cursor,
    )
}

// x x x x x x x x | disp
pub(crate) fn short_jump(operation: Operation, cursor: &mut ByteCursor) -> Result<Instruction> {
    let displacement = cursor.read_u8()? as i8;

    Ok(finish(
        operation,
        [Immediate::jump(displacement).into(), Operand::None],
        OperandSize::Byte,
        cursor,
    ))
}

pub(crate) fn no_operands(operation: Operation, cursor: &ByteCursor) -> Instruction {
    finish(operation, [Operand::None; 2], OperandSize::Byte, cursor)
}
