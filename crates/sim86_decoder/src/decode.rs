use crate::common::{
    immediate_to_accumulator, immediate_to_register, immediate_to_register_or_memory,
    memory_and_accumulator, no_operands, register16, register_or_memory,
    register_or_memory_and_register, register_or_memory_and_segment, register_or_memory_by_count,
    short_jump, unknown_op_code, Direction,
};
use crate::cursor::{ByteCursor, ReadExt};
use crate::errors::Result;
use crate::mod_reg_rm::segment_from_encoding;
use crate::DecodeError;
use sim86_instruction::{Instruction, Operand, Operation, Register};

fn group1_operation(bits: u8) -> Operation {
    match bits & 0b111 {
        0b000 => Operation::ADD,
        0b001 => Operation::OR,
        0b010 => Operation::ADC,
        0b011 => Operation::SBB,
        0b100 => Operation::AND,
        0b101 => Operation::SUB,
        0b110 => Operation::XOR,
        0b111 => Operation::CMP,

        _ => unreachable!(),
    }
}

fn group2_operation(bits: u8) -> Option<Operation> {
    match bits & 0b111 {
        0b100 => Some(Operation::SHL),
        0b101 => Some(Operation::SHR),
        0b110 => Some(Operation::SHL),
        0b111 => Some(Operation::SAR),

        // Rotates.
        _ => None,
    }
}

fn jump_operation(op_code: u8) -> Operation {
    use Operation::*;

    const CONDITIONAL: [Operation; 16] = [
        JO, JNO, JB, JAE, JZ, JNZ, JBE, JA, JS, JNS, JP, JNP, JL, JGE, JLE, JG,
    ];
    const LOOPS: [Operation; 4] = [LOOPNZ, LOOPZ, LOOP, JCXZ];

    match op_code {
        0x70..=0x7F => CONDITIONAL[(op_code & 0x0F) as usize],
        0xE0..=0xE3 => LOOPS[(op_code & 0b11) as usize],
        _ => JMP,
    }
}

fn is_segment_prefix(op_code: u8) -> bool {
    matches!(op_code, 0x26 | 0x2E | 0x36 | 0x3E)
}

fn override_segment(instruction: &mut Instruction, segment: Register) {
    for operand in instruction.operands.iter_mut() {
        if let Operand::Memory(ref mut expression) = operand {
            expression.segment = Some(segment);
        }
    }
}

/// Decode the single instruction that starts at `offset` in `data`.
///
/// ```rust
/// use sim86_decoder::decode_instruction;
///
/// let instruction = decode_instruction(&[0x89, 0xD9], 0).unwrap();
/// assert_eq!("mov cx, bx", instruction.to_string());
/// assert_eq!(2, instruction.size);
/// ```
pub fn decode_instruction(data: &[u8], offset: usize) -> Result<Instruction> {
    if offset >= data.len() {
        return Err(DecodeError::EndOfInput { offset });
    }

    let mut cursor = ByteCursor::new(data, offset);

    let mut segment = None;
    let mut op_code = cursor.read_u8()?;
    while is_segment_prefix(op_code) {
        segment = Some(segment_from_encoding(op_code >> 3));
        op_code = cursor.read_u8()?;
    }

    let mut instruction = decode_op_code(op_code, &mut cursor)?;

    if let Some(segment) = segment {
        override_segment(&mut instruction, segment);
    }

    Ok(instruction)
}

fn decode_op_code(op_code: u8, cursor: &mut ByteCursor) -> Result<Instruction> {
    match op_code {
        // 0 0 o o o 0 d w
        0x00..=0x3F if op_code & 0b100 == 0 => register_or_memory_and_register(
            group1_operation(op_code >> 3),
            Direction::Detect,
            op_code,
            cursor,
        ),

        // 0 0 o o o 1 0 w
        0x00..=0x3F if op_code & 0b110 == 0b100 => {
            immediate_to_accumulator(group1_operation(op_code >> 3), op_code, cursor)
        }

        0x40..=0x47 => Ok(register16(Operation::INC, op_code, cursor)),
        0x48..=0x4F => Ok(register16(Operation::DEC, op_code, cursor)),

        0x70..=0x7F | 0xE0..=0xE3 | 0xEB => short_jump(jump_operation(op_code), cursor),

        0x80..=0x83 => {
            let mrrm = cursor.read_mrrm()?;
            let sign_extend = op_code == 0x83;
            immediate_to_register_or_memory(
                group1_operation(mrrm.register),
                mrrm,
                op_code,
                sign_extend,
                cursor,
            )
        }

        0x84 | 0x85 => register_or_memory_and_register(
            Operation::TEST,
            Direction::RegMemFirst,
            op_code,
            cursor,
        ),

        0x88..=0x8B => {
            register_or_memory_and_register(Operation::MOV, Direction::Detect, op_code, cursor)
        }

        0x8C | 0x8E => register_or_memory_and_segment(op_code, cursor),

        0xA0..=0xA3 => memory_and_accumulator(op_code, cursor),

        0xA8 | 0xA9 => immediate_to_accumulator(Operation::TEST, op_code, cursor),

        0xB0..=0xBF => immediate_to_register(op_code, cursor),

        0xC6 | 0xC7 => {
            let mrrm = cursor.read_mrrm()?;
            if mrrm.register != 0b000 {
                return Err(unknown_op_code(op_code, cursor));
            }
            immediate_to_register_or_memory(Operation::MOV, mrrm, op_code, false, cursor)
        }

        0xD0..=0xD3 => {
            let mrrm = cursor.read_mrrm()?;
            match group2_operation(mrrm.register) {
                Some(operation) => Ok(register_or_memory_by_count(
                    operation, mrrm, op_code, cursor,
                )),
                None => Err(unknown_op_code(op_code, cursor)),
            }
        }

        0xF4 => Ok(no_operands(Operation::HLT, cursor)),

        0xF6 | 0xF7 => {
            let mrrm = cursor.read_mrrm()?;
            let operation = match mrrm.register {
                0b000 => {
                    return immediate_to_register_or_memory(
                        Operation::TEST,
                        mrrm,
                        op_code,
                        false,
                        cursor,
                    )
                }
                0b010 => Operation::NOT,
                0b011 => Operation::NEG,
                0b100 => Operation::MUL,
                0b101 => Operation::IMUL,
                _ => return Err(unknown_op_code(op_code, cursor)),
            };
            Ok(register_or_memory(operation, mrrm, op_code, cursor))
        }

        0xFE | 0xFF => {
            let mrrm = cursor.read_mrrm()?;
            let operation = match mrrm.register {
                0b000 => Operation::INC,
                0b001 => Operation::DEC,
                _ => return Err(unknown_op_code(op_code, cursor)),
            };
            Ok(register_or_memory(operation, mrrm, op_code, cursor))
        }

        _ => Err(unknown_op_code(op_code, cursor)),
    }
}

/// Decodes a stream of instructions from the start of a buffer, yielding each instruction with
/// the offset it was decoded at.  Iteration ends at the end of the buffer or after the first
/// error.
pub struct Decoder<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            failed: false,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<(usize, Instruction)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        let at = self.offset;
        match decode_instruction(self.data, at) {
            Ok(instruction) => {
                self.offset += instruction.size;
                Some(Ok((at, instruction)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
