//! This crate holds all the structs and constants to represent a decoded instruction for the 8086
//! microprocessor, as well as the text rendering used for disassembly listings.

mod address;
mod display;
mod instruction;
mod operand;
mod operation;
mod register;

pub use address::Address;
pub use instruction::Instruction;
pub use operand::{
    AddressExpression, AddressTerm, AddressingMode, Displacement, Immediate, Operand, OperandSize,
};
pub use operation::Operation;
pub use register::{Register, RegisterAccess};
