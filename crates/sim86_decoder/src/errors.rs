use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown op code ({op_code:#04x}) at offset {offset}")]
    UnknownOpcode { op_code: u8, offset: usize },

    #[error("Instruction at offset {offset} is truncated")]
    TruncatedInstruction { offset: usize },

    #[error("No instruction at offset {offset}, end of input")]
    EndOfInput { offset: usize },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
