//! Instruction Representation
//!
//! An opcode with its operand: a pushed value, a space index, or a resolved
//! jump target. Unused operands are zero.

use std::fmt;

use super::opcode::OpCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: OpCode,
    pub operand: i64,
}

impl Instruction {
    /// Create an instruction with no operand
    pub fn new(opcode: OpCode) -> Self {
        Instruction { opcode, operand: 0 }
    }

    /// Create an instruction with a single operand
    pub fn with_operand(opcode: OpCode, operand: i64) -> Self {
        Instruction { opcode, operand }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.opcode.has_operand() {
            write!(f, "{} {}", self.opcode.name(), self.operand)
        } else {
            f.write_str(self.opcode.name())
        }
    }
}
