//! Machine
//!
//! Drives a runtime through a program in order, one instruction per step.
//! Branch instructions jump when their predicate holds; running past the
//! last instruction behaves like `HALT`.

use std::io::{BufRead, Write};
use std::ops::ControlFlow;

use tracing::trace;

use crate::bytecode::{Instruction, OpCode, Program};
use crate::config::AheuiConfig;
use crate::error::{AheuiError, AheuiResult};

use super::runtime::{Exit, Runtime};
use super::spaces::Spaces;

#[derive(Debug)]
pub struct Machine<R, W> {
    config: AheuiConfig,
    program: Program,
    runtime: Runtime<R, W>,
    pc: usize,
    steps: u64,
}

impl<R: BufRead, W: Write> Machine<R, W> {
    pub fn new(config: AheuiConfig, program: Program, runtime: Runtime<R, W>) -> Self {
        Machine {
            config,
            program,
            runtime,
            pc: 0,
            steps: 0,
        }
    }

    /// Execute until the program terminates or faults
    pub fn run(&mut self) -> AheuiResult<Exit> {
        loop {
            if let ControlFlow::Break(exit) = self.step()? {
                return Ok(exit);
            }
        }
    }

    /// Execute a single instruction
    pub fn step(&mut self) -> AheuiResult<ControlFlow<Exit>> {
        let Some(instruction) = self.program.get(self.pc) else {
            trace!(pc = self.pc, "ran off the end");
            return self.runtime.halt().map(ControlFlow::Break);
        };

        if let Some(limit) = self.config.step_limit {
            if self.steps >= limit {
                return Err(AheuiError::StepLimitExceeded(limit));
            }
        }
        self.steps += 1;
        let pc = self.pc;
        trace!(pc, %instruction, "step");

        let rt = &mut self.runtime;
        let mut next = pc + 1;
        match instruction.opcode {
            OpCode::Add => rt.add()?,
            OpCode::Sub => rt.sub()?,
            OpCode::Mul => rt.mul()?,
            OpCode::Div => rt.div()?,
            OpCode::Mod => rt.rem()?,
            OpCode::Cmp => rt.cmp()?,

            OpCode::Push => rt.push(instruction.operand)?,
            OpCode::Pop => rt.pop()?,
            OpCode::Dup => rt.dup()?,
            OpCode::Swap => rt.swap()?,
            OpCode::Sel => rt.select(Spaces::index(instruction.operand)?)?,
            OpCode::Mov => rt.move_to(Spaces::index(instruction.operand)?)?,

            OpCode::PopNum => rt.output_number()?,
            OpCode::PopChar => {
                if let ControlFlow::Break(exit) = rt.output_character()? {
                    return Ok(ControlFlow::Break(exit));
                }
            }
            OpCode::PushNum => rt.input_number()?,
            OpCode::PushChar => rt.input_character()?,

            OpCode::Halt => return rt.halt().map(ControlFlow::Break),
            OpCode::Brz => {
                if rt.branch_if_zero_consuming()? {
                    next = jump_target(pc, instruction)?;
                }
            }
            OpCode::BrPop1 => {
                if rt.branch_if_fewer_than(1)? {
                    next = jump_target(pc, instruction)?;
                }
            }
            OpCode::BrPop2 => {
                if rt.branch_if_fewer_than(2)? {
                    next = jump_target(pc, instruction)?;
                }
            }
            OpCode::Jmp => next = jump_target(pc, instruction)?,
        }

        self.pc = next;
        Ok(ControlFlow::Continue(()))
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn runtime(&self) -> &Runtime<R, W> {
        &self.runtime
    }

    pub fn into_runtime(self) -> Runtime<R, W> {
        self.runtime
    }
}

fn jump_target(pc: usize, instruction: Instruction) -> AheuiResult<usize> {
    usize::try_from(instruction.operand).map_err(|_| AheuiError::InvalidJumpTarget {
        index: pc,
        target: instruction.operand,
    })
}
