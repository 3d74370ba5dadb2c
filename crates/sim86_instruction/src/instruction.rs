use crate::{Operand, OperandSize, Operation};

/// Representation of a decoded 8086 instruction.
///
/// ```rust
/// use sim86_instruction::*;
///
/// // mov cx, bx
/// let i = Instruction::new(
///     Operation::MOV,
///     [
///         Operand::Register(RegisterAccess::word(Register::C)),
///         Operand::Register(RegisterAccess::word(Register::B)),
///     ],
///     OperandSize::Word,
///     2,
/// );
/// assert_eq!("mov cx, bx", i.to_string());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub operation: Operation,
    /// Operand 0 is the destination when the operation writes back, operand 1 the source.
    pub operands: [Operand; 2],
    pub operand_size: OperandSize,
    /// Number of bytes consumed from the stream, prefixes included.
    pub size: usize,
}

impl Instruction {
    pub fn new(
        operation: Operation,
        operands: [Operand; 2],
        operand_size: OperandSize,
        size: usize,
    ) -> Self {
        Self {
            operation,
            operands,
            operand_size,
            size,
        }
    }

    pub fn is_wide(&self) -> bool {
        self.operand_size.is_wide()
    }

    pub fn destination(&self) -> &Operand {
        &self.operands[0]
    }

    pub fn source(&self) -> &Operand {
        &self.operands[1]
    }

    /// For relative jumps, the offset of the jump target given the offset this instruction was
    /// decoded at.  The displacement is relative to the end of the instruction.  Targets before
    /// the start of the stream have no offset.
    pub fn jump_target(&self, at: usize) -> Option<usize> {
        match self.operands[0] {
            Operand::Immediate(immediate) if immediate.relative_jump => {
                let next = at as i64 + self.size as i64;
                usize::try_from(next + immediate.value as i64).ok()
            }
            _ => None,
        }
    }
}
