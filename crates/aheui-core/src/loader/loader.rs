//! Program Loader
//!
//! Reads programs from assembly text or compiled bytecode.
//! This layer performs structural validation only.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::bytecode::{Instruction, OpCode, Program};
use crate::error::{AheuiError, AheuiResult};

/// Marks the end of a bytecode record stream
pub const BYTECODE_TERMINATOR: [u8; 4] = [0xFF; 4];

/// Size of one bytecode record: three operand bytes and the opcode
pub const RECORD_SIZE: usize = 4;

/// Source representation of a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Asm,
    Bytecode,
}

impl SourceKind {
    /// Guess the representation from the file name, then the contents.
    pub fn detect(path: Option<&Path>, contents: &[u8]) -> AheuiResult<Self> {
        match path.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
            Some("aheuic") => return Ok(SourceKind::Bytecode),
            Some("aheuis") => return Ok(SourceKind::Asm),
            Some("aheui") => {
                return Err(AheuiError::UnsupportedSource(
                    "grid source must be translated to assembly first".to_string(),
                ))
            }
            _ => {}
        }
        if contents
            .windows(RECORD_SIZE)
            .any(|w| w == BYTECODE_TERMINATOR)
        {
            Ok(SourceKind::Bytecode)
        } else {
            Ok(SourceKind::Asm)
        }
    }
}

/// Program loader
pub struct ProgramLoader;

impl ProgramLoader {
    pub fn load(contents: &[u8], kind: SourceKind) -> AheuiResult<Program> {
        let program = match kind {
            SourceKind::Asm => {
                let text = std::str::from_utf8(contents).map_err(|_| AheuiError::InvalidUtf8)?;
                Self::load_asm(text)?
            }
            SourceKind::Bytecode => Self::load_bytecode(contents)?,
        };
        debug!(instructions = program.len(), ?kind, "program loaded");
        Ok(program)
    }

    /// Parse assembly text.
    ///
    /// Each line holds at most one instruction, optionally prefixed by
    /// `label:` and followed by a `;` comment. Jump operands name labels,
    /// which may be defined later in the text.
    pub fn load_asm(text: &str) -> AheuiResult<Program> {
        let mut instructions = Vec::new();
        let mut labels: HashMap<&str, usize> = HashMap::new();
        let mut pending: Vec<(usize, &str)> = Vec::new();

        for (line_index, row) in text.lines().enumerate() {
            let line = line_index + 1;
            let mut main = row.split(';').next().unwrap_or_default();

            if let Some((label, rest)) = main.split_once(':') {
                let label = label.trim();
                if !label.is_empty() && labels.insert(label, instructions.len()).is_some() {
                    return Err(AheuiError::DuplicateLabel {
                        label: label.to_string(),
                        line,
                    });
                }
                main = rest;
            }

            let mut parts = main.split_whitespace();
            let Some(name) = parts.next() else {
                continue;
            };
            let opcode = OpCode::from_name(name).ok_or_else(|| AheuiError::UnknownInstruction {
                name: name.to_string(),
                line,
            })?;

            if !opcode.has_operand() {
                instructions.push(Instruction::new(opcode));
                continue;
            }

            let operand = parts.last().ok_or(AheuiError::MissingOperand {
                name: opcode.name(),
                line,
            })?;
            if opcode.is_jump() {
                pending.push((instructions.len(), operand));
                instructions.push(Instruction::new(opcode));
            } else {
                let value = operand.parse::<i64>().map_err(|_| AheuiError::InvalidOperand {
                    text: operand.to_string(),
                    line,
                })?;
                instructions.push(Instruction::with_operand(opcode, value));
            }
        }

        for (index, label) in pending {
            let target = labels
                .get(label)
                .ok_or_else(|| AheuiError::UndefinedLabel(label.to_string()))?;
            instructions[index].operand = *target as i64;
        }

        Program::new(instructions)
    }

    /// Parse bytecode records until the terminator or the end of input.
    pub fn load_bytecode(bytes: &[u8]) -> AheuiResult<Program> {
        let mut instructions = Vec::new();

        for (index, record) in bytes.chunks(RECORD_SIZE).enumerate() {
            if record == BYTECODE_TERMINATOR {
                break;
            }
            if record.len() < RECORD_SIZE {
                return Err(AheuiError::BytecodeTruncated(index * RECORD_SIZE));
            }
            let opcode = OpCode::from_u8(record[3]).ok_or(AheuiError::InvalidOpcode(record[3]))?;
            let instruction = if opcode.has_operand() {
                let operand =
                    i64::from(record[0]) | i64::from(record[1]) << 8 | i64::from(record[2]) << 16;
                Instruction::with_operand(opcode, operand)
            } else {
                Instruction::new(opcode)
            };
            instructions.push(instruction);
        }

        Program::new(instructions)
    }
}
