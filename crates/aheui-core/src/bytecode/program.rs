//! Validated instruction sequence

use crate::error::{AheuiError, AheuiResult};
use crate::vm::spaces::Spaces;
use super::instruction::Instruction;
use super::opcode::OpCode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Build a program, checking space operands and jump targets.
    ///
    /// A jump target equal to the program length is allowed and means
    /// "run off the end".
    pub fn new(instructions: Vec<Instruction>) -> AheuiResult<Self> {
        let len = instructions.len();
        for (index, instruction) in instructions.iter().enumerate() {
            match instruction.opcode {
                OpCode::Sel | OpCode::Mov => {
                    Spaces::index(instruction.operand)?;
                }
                op if op.is_jump() => {
                    let target = instruction.operand;
                    if usize::try_from(target).map_or(true, |t| t > len) {
                        return Err(AheuiError::InvalidJumpTarget { index, target });
                    }
                }
                _ => {}
            }
        }
        Ok(Program { instructions })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn get(&self, pc: usize) -> Option<Instruction> {
        self.instructions.get(pc).copied()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Indices that some jump lands on, ascending
    pub fn jump_targets(&self) -> Vec<usize> {
        let mut targets: Vec<usize> = self
            .instructions
            .iter()
            .filter(|i| i.opcode.is_jump())
            .filter_map(|i| usize::try_from(i.operand).ok())
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_space_operand() {
        let res = Program::new(vec![Instruction::with_operand(OpCode::Sel, 28)]);
        assert!(matches!(res, Err(AheuiError::InvalidSpace(28))));
    }

    #[test]
    fn rejects_jump_past_end() {
        let res = Program::new(vec![
            Instruction::with_operand(OpCode::Jmp, 3),
            Instruction::new(OpCode::Halt),
        ]);
        assert!(matches!(
            res,
            Err(AheuiError::InvalidJumpTarget { index: 0, target: 3 })
        ));
    }

    #[test]
    fn jump_to_end_is_allowed() {
        let program = Program::new(vec![
            Instruction::with_operand(OpCode::Brz, 2),
            Instruction::with_operand(OpCode::Jmp, 0),
        ])
        .unwrap();
        assert_eq!(program.jump_targets(), vec![0, 2]);
    }
}
