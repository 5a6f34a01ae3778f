//! Aheui Error Types
//!
//! Defines all error conditions produced by the runtime, the loader and the
//! driver. Program-authored termination (`halt`, out-of-range characters) is
//! not an error and never appears here; see [`crate::vm::runtime::Exit`].

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AheuiError {
    // Storage errors
    #[error("storage underflow: {op} needs {required} value(s), found {available}")]
    StorageUnderflow {
        op: &'static str,
        required: usize,
        available: usize,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid space index: {0}")]
    InvalidSpace(i64),

    // Runtime state
    #[error("runtime already terminated")]
    Terminated,
    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(u64),

    // Input boundary
    #[error("unexpected end of input while reading a number")]
    UnexpectedEof,
    #[error("input parse error: {0:?} is not a 64-bit decimal integer")]
    InputParse(String),

    // Program loading
    #[error("unknown instruction {name:?} at line {line}")]
    UnknownInstruction { name: String, line: usize },
    #[error("missing operand for {name} at line {line}")]
    MissingOperand { name: &'static str, line: usize },
    #[error("invalid operand {text:?} at line {line}")]
    InvalidOperand { text: String, line: usize },
    #[error("undefined label {0:?}")]
    UndefinedLabel(String),
    #[error("duplicate label {label:?} at line {line}")]
    DuplicateLabel { label: String, line: usize },
    #[error("invalid opcode: 0x{0:02X}")]
    InvalidOpcode(u8),
    #[error("bytecode is truncated at offset {0}")]
    BytecodeTruncated(usize),
    #[error("invalid jump target {target} at instruction {index}")]
    InvalidJumpTarget { index: usize, target: i64 },
    #[error("operand {operand} at instruction {index} does not fit in bytecode")]
    OperandOutOfRange { index: usize, operand: i64 },
    #[error("assembly source is not valid UTF-8")]
    InvalidUtf8,
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    // IO boundary
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type AheuiResult<T> = Result<T, AheuiError>;
