//! Space Table
//!
//! Fixed, index-based table of storages allocated once per runtime.

use crate::error::{AheuiError, AheuiResult};
use super::storage::Storage;

/// Number of addressable spaces
pub const SPACE_COUNT: usize = 28;

/// Index of the single queue space
pub const QUEUE_INDEX: usize = 21;

/// Conventional I/O port space. Not special-cased by the runtime.
pub const PORT_INDEX: usize = 27;

/// The 28 storages a program can select between
#[derive(Debug, Clone)]
pub struct Spaces {
    slots: [Storage; SPACE_COUNT],
}

impl Spaces {
    pub fn new() -> Self {
        Spaces {
            slots: std::array::from_fn(|index| {
                if index == QUEUE_INDEX {
                    Storage::queue()
                } else {
                    Storage::stack()
                }
            }),
        }
    }

    /// Validate a raw space operand
    pub fn index(raw: i64) -> AheuiResult<usize> {
        usize::try_from(raw)
            .ok()
            .filter(|&index| index < SPACE_COUNT)
            .ok_or(AheuiError::InvalidSpace(raw))
    }

    pub fn get(&self, index: usize) -> AheuiResult<&Storage> {
        self.slots
            .get(index)
            .ok_or(AheuiError::InvalidSpace(index as i64))
    }

    pub fn get_mut(&mut self, index: usize) -> AheuiResult<&mut Storage> {
        self.slots
            .get_mut(index)
            .ok_or(AheuiError::InvalidSpace(index as i64))
    }
}

impl Default for Spaces {
    fn default() -> Self {
        Self::new()
    }
}
