//! Storage Implementation
//!
//! A storage is an ordered sequence with an insertion end (the back). Both
//! variants push, duplicate, swap and compute at the back. They differ only
//! in `pop`: a stack removes the newest element, a queue the oldest.

use std::collections::VecDeque;

use crate::error::{AheuiError, AheuiResult};
use super::value::Value;

/// Storage variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Stack,
    Queue,
}

/// Binary arithmetic family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Cmp,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Mod => "mod",
            BinaryOp::Cmp => "cmp",
        }
    }

    /// Compute `second <op> first`, where `first` was nearest the insertion end.
    pub fn apply(self, second: Value, first: Value) -> AheuiResult<Value> {
        match self {
            BinaryOp::Add => Ok(second.wrapping_add(first)),
            BinaryOp::Sub => Ok(second.wrapping_sub(first)),
            BinaryOp::Mul => Ok(second.wrapping_mul(first)),
            BinaryOp::Div => {
                if first == 0 {
                    return Err(AheuiError::DivisionByZero);
                }
                Ok(second.wrapping_div(first))
            }
            BinaryOp::Mod => {
                if first == 0 {
                    return Err(AheuiError::DivisionByZero);
                }
                Ok(second.wrapping_rem(first))
            }
            BinaryOp::Cmp => Ok(Value::from(second >= first)),
        }
    }
}

/// A single addressable space
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Stack(Vec<Value>),
    Queue(VecDeque<Value>),
}

impl Storage {
    pub fn stack() -> Self {
        Storage::Stack(Vec::new())
    }

    pub fn queue() -> Self {
        Storage::Queue(VecDeque::new())
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            Storage::Stack(_) => StorageKind::Stack,
            Storage::Queue(_) => StorageKind::Queue,
        }
    }

    /// Current element count
    pub fn size(&self) -> usize {
        match self {
            Storage::Stack(values) => values.len(),
            Storage::Queue(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Contents in insertion order, oldest first
    pub fn to_vec(&self) -> Vec<Value> {
        match self {
            Storage::Stack(values) => values.clone(),
            Storage::Queue(values) => values.iter().copied().collect(),
        }
    }

    /// Append at the insertion end
    pub fn push(&mut self, value: Value) {
        match self {
            Storage::Stack(values) => values.push(value),
            Storage::Queue(values) => values.push_back(value),
        }
    }

    /// Remove from the variant's removal end
    pub fn pop(&mut self) -> AheuiResult<Value> {
        let value = match self {
            Storage::Stack(values) => values.pop(),
            Storage::Queue(values) => values.pop_front(),
        };
        value.ok_or(AheuiError::StorageUnderflow {
            op: "pop",
            required: 1,
            available: 0,
        })
    }

    /// Copy the element at the insertion end
    pub fn dup(&mut self) -> AheuiResult<()> {
        self.require("dup", 1)?;
        let top = self.back(0);
        self.push(top);
        Ok(())
    }

    /// Exchange the two elements nearest the insertion end
    pub fn swap(&mut self) -> AheuiResult<()> {
        self.require("swap", 2)?;
        let len = self.size();
        match self {
            Storage::Stack(values) => values.swap(len - 1, len - 2),
            Storage::Queue(values) => values.swap(len - 1, len - 2),
        }
        Ok(())
    }

    /// Replace the two elements nearest the insertion end with `op`'s result.
    ///
    /// The storage is left untouched when the operation fails.
    pub fn binary(&mut self, op: BinaryOp) -> AheuiResult<()> {
        self.require(op.name(), 2)?;
        let result = op.apply(self.back(1), self.back(0))?;
        match self {
            Storage::Stack(values) => {
                values.pop();
                if let Some(slot) = values.last_mut() {
                    *slot = result;
                }
            }
            Storage::Queue(values) => {
                values.pop_back();
                values.pop_back();
                values.push_back(result);
            }
        }
        Ok(())
    }

    pub fn add(&mut self) -> AheuiResult<()> {
        self.binary(BinaryOp::Add)
    }

    pub fn sub(&mut self) -> AheuiResult<()> {
        self.binary(BinaryOp::Sub)
    }

    pub fn mul(&mut self) -> AheuiResult<()> {
        self.binary(BinaryOp::Mul)
    }

    pub fn div(&mut self) -> AheuiResult<()> {
        self.binary(BinaryOp::Div)
    }

    pub fn rem(&mut self) -> AheuiResult<()> {
        self.binary(BinaryOp::Mod)
    }

    pub fn cmp(&mut self) -> AheuiResult<()> {
        self.binary(BinaryOp::Cmp)
    }

    fn require(&self, op: &'static str, required: usize) -> AheuiResult<()> {
        let available = self.size();
        if available < required {
            return Err(AheuiError::StorageUnderflow {
                op,
                required,
                available,
            });
        }
        Ok(())
    }

    // Element `depth` positions behind the insertion end. Callers check size first.
    fn back(&self, depth: usize) -> Value {
        let index = self.size() - 1 - depth;
        match self {
            Storage::Stack(values) => values[index],
            Storage::Queue(values) => values[index],
        }
    }
}
