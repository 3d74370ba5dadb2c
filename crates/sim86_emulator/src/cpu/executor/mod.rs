use crate::cpu::{physical_address, Cpu, Flags, Location, MemoryCell, OperandSink};
use crate::error::{Error, Result};
use sim86_instruction::{
    Immediate, Instruction, Operand, OperandSize, Operation, Register, RegisterAccess,
};

pub mod operations;

#[derive(Debug, PartialEq, Eq)]
pub enum ExecuteResult {
    Continue,
    Stop,
}

fn illegal_operands(instruction: &Instruction) -> Error {
    Error::IllegalOperands(*instruction)
}

/// Resolve a register or memory operand against the current state.
fn locate(cpu: &Cpu, operand: &Operand, operand_size: OperandSize) -> Result<Option<Location>> {
    Ok(match operand {
        Operand::Register(register) => Some(Location::Register(*register)),
        Operand::Memory(expression) => Some(Location::Memory(MemoryCell {
            address: physical_address(expression, &cpu.state, cpu.memory.mask())?,
            operand_size,
        })),
        Operand::Immediate(_) | Operand::None => None,
    })
}

fn destination(cpu: &Cpu, instruction: &Instruction) -> Result<Location> {
    locate(cpu, instruction.destination(), instruction.operand_size)?
        .ok_or_else(|| illegal_operands(instruction))
}

fn source_value(cpu: &Cpu, instruction: &Instruction) -> Result<u16> {
    match instruction.source() {
        Operand::Immediate(immediate) => {
            Ok(immediate.value as u16 & instruction.operand_size.mask())
        }
        operand => match locate(cpu, operand, instruction.operand_size)? {
            Some(location) => location.read(cpu),
            None => Err(illegal_operands(instruction)),
        },
    }
}

/// Execute an already fetched instruction.  `ip` must already point past the instruction.
pub fn execute(cpu: &mut Cpu, instruction: &Instruction) -> Result<ExecuteResult> {
    use Operation::*;

    match instruction.operation {
        HLT => return Ok(ExecuteResult::Stop),

        operation if operation.is_jump() => jump(cpu, instruction)?,

        MUL | IMUL => multiply(cpu, instruction)?,

        INC | DEC | NEG | NOT => destination_only(cpu, instruction)?,

        _ => destination_and_source(cpu, instruction)?,
    }

    Ok(ExecuteResult::Continue)
}

fn destination_and_source(cpu: &mut Cpu, instruction: &Instruction) -> Result<()> {
    macro_rules! destination_and_source_ops {
        ($operation:expr,$d:expr,$s:expr,$flags:expr,$size:ident) => {{
            use operations as op;
            use Operation::*;
            match $operation {
                MOV => Some(Some($s)),
                ADD => Some(op::$size::add($d, $s, $flags)),
                ADC => Some(op::$size::add_with_carry($d, $s, $flags)),
                SUB => Some(op::$size::subtract($d, $s, $flags)),
                SBB => Some(op::$size::subtract_with_borrow($d, $s, $flags)),
                CMP => Some(op::$size::compare($d, $s, $flags)),
                AND => Some(op::$size::and($d, $s, $flags)),
                OR => Some(op::$size::or($d, $s, $flags)),
                XOR => Some(op::$size::exclusive_or($d, $s, $flags)),
                TEST => Some(op::$size::test($d, $s, $flags)),
                SHL => Some(op::$size::shift_left($d, $s as u8, $flags)),
                SHR => Some(op::$size::shift_right($d, $s as u8, $flags)),
                SAR => Some(op::$size::shift_arithmetic_right($d, $s as u8, $flags)),
                _ => None,
            }
        }};
    }

    let destination = destination(cpu, instruction)?;
    let d = destination.read(cpu)?;
    let s = source_value(cpu, instruction)?;

    let mut flags = cpu.state.flags();
    let result = match instruction.operand_size {
        OperandSize::Byte => destination_and_source_ops!(
            instruction.operation,
            d as u8,
            s as u8,
            &mut flags,
            byte
        )
        .map(|result| result.map(u16::from)),
        OperandSize::Word => {
            destination_and_source_ops!(instruction.operation, d, s, &mut flags, word)
        }
    }
    .ok_or_else(|| illegal_operands(instruction))?;
    cpu.state.set_flags(flags);

    if let Some(result) = result {
        destination.write(cpu, result)?;
    }

    Ok(())
}

fn destination_only(cpu: &mut Cpu, instruction: &Instruction) -> Result<()> {
    macro_rules! destination_ops {
        ($operation:expr,$d:expr,$flags:expr,$size:ident) => {{
            use operations as op;
            use Operation::*;
            match $operation {
                INC => Some(op::$size::increment($d, $flags)),
                DEC => Some(op::$size::decrement($d, $flags)),
                NEG => Some(op::$size::negate($d, $flags)),
                NOT => Some(op::$size::not($d)),
                _ => None,
            }
        }};
    }

    let destination = destination(cpu, instruction)?;
    let d = destination.read(cpu)?;

    let mut flags = cpu.state.flags();
    let result = match instruction.operand_size {
        OperandSize::Byte => destination_ops!(instruction.operation, d as u8, &mut flags, byte)
            .map(|result| result.map(u16::from)),
        OperandSize::Word => destination_ops!(instruction.operation, d, &mut flags, word),
    }
    .ok_or_else(|| illegal_operands(instruction))?;
    cpu.state.set_flags(flags);

    if let Some(result) = result {
        destination.write(cpu, result)?;
    }

    Ok(())
}

/// `mul`/`imul` multiply the accumulator by the operand and store the double width product in
/// `ah:al` or `dx:ax`.
fn multiply(cpu: &mut Cpu, instruction: &Instruction) -> Result<()> {
    use operations as op;

    let signed = instruction.operation == Operation::IMUL;
    let source = destination(cpu, instruction)?.read(cpu)?;

    let mut flags = cpu.state.flags();
    match instruction.operand_size {
        OperandSize::Byte => {
            let al = cpu.state.read(RegisterAccess::low(Register::A))? as u8;
            let (low, high) = if signed {
                op::byte::signed_multiply(al, source as u8, &mut flags)
            } else {
                op::byte::multiply(al, source as u8, &mut flags)
            };
            cpu.state
                .set_register(Register::A, u16::from_le_bytes([low, high]));
        }
        OperandSize::Word => {
            let ax = cpu.state.register(Register::A);
            let (low, high) = if signed {
                op::word::signed_multiply(ax, source, &mut flags)
            } else {
                op::word::multiply(ax, source, &mut flags)
            };
            cpu.state.set_register(Register::A, low);
            cpu.state.set_register(Register::D, high);
        }
    }
    cpu.state.set_flags(flags);

    Ok(())
}

fn condition(operation: Operation, flags: Flags) -> bool {
    use Operation::*;

    let carry = flags.contains(Flags::CARRY);
    let zero = flags.contains(Flags::ZERO);
    let sign = flags.contains(Flags::SIGN);
    let overflow = flags.contains(Flags::OVERFLOW);
    let parity = flags.contains(Flags::PARITY);

    match operation {
        JMP => true,
        JO => overflow,
        JNO => !overflow,
        JB => carry,
        JAE => !carry,
        JZ => zero,
        JNZ => !zero,
        JBE => carry || zero,
        JA => !(carry || zero),
        JS => sign,
        JNS => !sign,
        JP => parity,
        JNP => !parity,
        JL => sign != overflow,
        JGE => sign == overflow,
        JLE => zero || sign != overflow,
        JG => !zero && sign == overflow,
        _ => false,
    }
}

fn jump(cpu: &mut Cpu, instruction: &Instruction) -> Result<()> {
    use Operation::*;

    let displacement = match instruction.destination() {
        Operand::Immediate(Immediate {
            value,
            relative_jump: true,
        }) => *value,
        _ => return Err(illegal_operands(instruction)),
    };

    let flags = cpu.state.flags();
    let taken = match instruction.operation {
        LOOP | LOOPZ | LOOPNZ => {
            let cx = cpu.state.register(Register::C).wrapping_sub(1);
            cpu.state.set_register(Register::C, cx);

            cx != 0
                && match instruction.operation {
                    LOOPZ => flags.contains(Flags::ZERO),
                    LOOPNZ => !flags.contains(Flags::ZERO),
                    _ => true,
                }
        }
        JCXZ => cpu.state.register(Register::C) == 0,
        operation => condition(operation, flags),
    };

    if taken {
        let ip = cpu.state.ip().wrapping_add(displacement as u16);
        cpu.state.set_ip(ip);
    }

    Ok(())
}
