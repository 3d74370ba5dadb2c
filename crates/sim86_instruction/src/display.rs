use crate::{AddressExpression, Displacement, Immediate, Instruction, Operand, OperandSize};
use std::fmt::{Display, Formatter};

/// Renders an instruction, optionally replacing its jump displacement with a label name.
pub struct Labeled<'a> {
    pub instruction: &'a Instruction,
    pub label: Option<&'a str>,
}

impl Instruction {
    pub fn with_label<'a>(&'a self, label: Option<&'a str>) -> Labeled<'a> {
        Labeled {
            instruction: self,
            label,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Labeled {
            instruction: self,
            label: None,
        }
        .fmt(f)
    }
}

impl Display for Labeled<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let instruction = self.instruction;

        self.instruction.operation.fmt(f)?;

        // Without a register operand the assembler can not infer the size of a memory access.  A
        // shift count in `cl` says nothing about the size of the destination.
        let sized_by = if instruction.operation.is_shift() {
            &instruction.operands[..1]
        } else {
            &instruction.operands[..]
        };
        let explicit_size = !sized_by.iter().any(Operand::is_register);

        let mut separator = " ";
        for operand in instruction.operands.iter().filter(|o| !o.is_none()) {
            f.write_str(separator)?;
            separator = ", ";

            match operand {
                Operand::Immediate(Immediate {
                    value,
                    relative_jump: true,
                }) => match self.label {
                    Some(label) => write!(f, "{} ; {}", label, value)?,
                    None => operand.fmt(f)?,
                },

                Operand::Memory(_) if explicit_size => {
                    match instruction.operand_size {
                        OperandSize::Byte => "byte ".fmt(f)?,
                        OperandSize::Word => "word ".fmt(f)?,
                    }
                    operand.fmt(f)?;
                }

                _ => operand.fmt(f)?,
            }
        }

        Ok(())
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Register(register) => register.fmt(f),
            Operand::Memory(expression) => expression.fmt(f),
            Operand::Immediate(immediate) => immediate.fmt(f),
        }
    }
}

impl Display for Immediate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for AddressExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(segment) = self.segment {
            write!(f, "{}:", segment.name())?;
        }

        if self.is_direct() {
            return write!(f, "[{}]", self.displacement.value() as u16);
        }

        "[".fmt(f)?;

        let mut separator = "";
        for term in self.terms.iter().flatten() {
            write!(f, "{}{}", separator, term.register)?;
            separator = " + ";
        }

        match self.displacement {
            Displacement::None => {}
            displacement => {
                let value = displacement.value();
                if value < 0 {
                    write!(f, " - {}", -value)?;
                } else {
                    write!(f, " + {}", value)?;
                }
            }
        }

        "]".fmt(f)
    }
}

#[cfg(test)]
mod test {
    use crate::*;

    fn reg(register: Register) -> Operand {
        Operand::Register(RegisterAccess::word(register))
    }

    #[test]
    fn memory_operands() {
        let e = AddressExpression::indirect(AddressingMode::BxSi, Displacement::None);
        assert_eq!("[bx + si]", e.to_string());

        let e = AddressExpression::indirect(AddressingMode::Bp, Displacement::Byte(0));
        assert_eq!("[bp + 0]", e.to_string());

        let e = AddressExpression::indirect(AddressingMode::BxDi, Displacement::Byte(-37));
        assert_eq!("[bx + di - 37]", e.to_string());

        let e = AddressExpression::indirect(AddressingMode::Si, Displacement::Word(-32768));
        assert_eq!("[si - 32768]", e.to_string());

        let e = AddressExpression::direct(0xFFFF);
        assert_eq!("[65535]", e.to_string());

        let mut e = AddressExpression::indirect(AddressingMode::Bx, Displacement::None);
        e.segment = Some(Register::ES);
        assert_eq!("es:[bx]", e.to_string());
    }

    #[test]
    fn explicit_size_without_register_operand() {
        let i = Instruction::new(
            Operation::MOV,
            [
                AddressExpression::indirect(AddressingMode::Bx, Displacement::None).into(),
                Immediate::new(5).into(),
            ],
            OperandSize::Word,
            4,
        );
        assert_eq!("mov word [bx], 5", i.to_string());

        let i = Instruction::new(
            Operation::INC,
            [
                AddressExpression::indirect(AddressingMode::Si, Displacement::None).into(),
                Operand::None,
            ],
            OperandSize::Byte,
            2,
        );
        assert_eq!("inc byte [si]", i.to_string());

        let i = Instruction::new(
            Operation::SHL,
            [
                AddressExpression::indirect(AddressingMode::Bx, Displacement::None).into(),
                RegisterAccess::low(Register::C).into(),
            ],
            OperandSize::Word,
            2,
        );
        assert_eq!("shl word [bx], cl", i.to_string());
    }

    #[test]
    fn register_operands() {
        let i = Instruction::new(
            Operation::ADD,
            [reg(Register::A), reg(Register::B)],
            OperandSize::Word,
            2,
        );
        assert_eq!("add ax, bx", i.to_string());

        let i = Instruction::new(Operation::HLT, [Operand::None; 2], OperandSize::Byte, 1);
        assert_eq!("hlt", i.to_string());
    }

    #[test]
    fn jumps() {
        let i = Instruction::new(
            Operation::JNZ,
            [Immediate::jump(-4).into(), Operand::None],
            OperandSize::Byte,
            2,
        );
        assert_eq!("jnz -4", i.to_string());
        assert_eq!(
            "jnz label_0 ; -4",
            i.with_label(Some("label_0")).to_string()
        );
    }
}
