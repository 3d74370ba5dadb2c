//! Turns a stream of 8086 machine code into [sim86_instruction::Instruction]s.

mod common;
mod cursor;
mod decode;
mod errors;
mod mod_reg_rm;

#[cfg(test)]
mod test;

pub use cursor::ByteCursor;
pub use decode::{decode_instruction, Decoder};
pub use errors::{DecodeError, Result};
pub use mod_reg_rm::{ModRegRM, RegisterOrMemory};
