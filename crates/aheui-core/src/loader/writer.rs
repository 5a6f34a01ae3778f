//! Program Writer
//!
//! Serializes a loaded program back to assembly text or bytecode records.

use crate::bytecode::{Instruction, Program};
use crate::error::{AheuiError, AheuiResult};
use super::loader::BYTECODE_TERMINATOR;

/// Largest operand a bytecode record can hold
const MAX_RECORD_OPERAND: i64 = 0xFF_FFFF;

pub struct ProgramWriter;

impl ProgramWriter {
    /// One instruction per line; jump targets get an `L<index>:` label.
    pub fn write_asm(program: &Program) -> String {
        let targets = program.jump_targets();
        let mut out = String::new();

        for (index, instruction) in program.instructions().iter().enumerate() {
            let label = if targets.binary_search(&index).is_ok() {
                format!("L{}:", index)
            } else {
                String::new()
            };
            let opcode = instruction.opcode;
            let code = if opcode.is_jump() {
                format!("{} L{}", opcode.name(), instruction.operand)
            } else if opcode.has_operand() {
                format!("{} {}", opcode.name(), instruction.operand)
            } else {
                opcode.name().to_string()
            };
            out.push_str(&format!("{:<8}{}\n", label, code));
        }

        // A jump may target the position just past the last instruction
        if targets.last() == Some(&program.len()) {
            out.push_str(&format!("L{}:\n", program.len()));
        }
        out
    }

    pub fn write_bytecode(program: &Program) -> AheuiResult<Vec<u8>> {
        let mut out = Vec::with_capacity((program.len() + 1) * BYTECODE_TERMINATOR.len());
        for (index, instruction) in program.instructions().iter().enumerate() {
            out.extend_from_slice(&encode_record(index, instruction)?);
        }
        out.extend_from_slice(&BYTECODE_TERMINATOR);
        Ok(out)
    }

    /// Bytecode followed by a blank line and the assembly listing.
    ///
    /// This is the layout of an `.aheuic` file; the loader stops at the
    /// terminator and ignores the listing.
    pub fn write_compiled(program: &Program) -> AheuiResult<Vec<u8>> {
        let mut out = Self::write_bytecode(program)?;
        out.extend_from_slice(b"\n\n");
        out.extend_from_slice(Self::write_asm(program).as_bytes());
        Ok(out)
    }
}

fn encode_record(index: usize, instruction: &Instruction) -> AheuiResult<[u8; 4]> {
    let operand = if instruction.opcode.has_operand() {
        instruction.operand
    } else {
        0
    };
    if !(0..=MAX_RECORD_OPERAND).contains(&operand) {
        return Err(AheuiError::OperandOutOfRange { index, operand });
    }
    let record = [
        (operand & 0xFF) as u8,
        ((operand >> 8) & 0xFF) as u8,
        ((operand >> 16) & 0xFF) as u8,
        instruction.opcode as u8,
    ];
    // JMP 0xFFFFFF would read back as the end of the program
    if record == BYTECODE_TERMINATOR {
        return Err(AheuiError::OperandOutOfRange { index, operand });
    }
    Ok(record)
}
