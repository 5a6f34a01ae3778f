//! Runtime Value Representation
//!
//! Every storage cell holds a fixed-width signed integer. Arithmetic wraps
//! on overflow; there is no arbitrary-precision fallback.

/// Runtime value
pub type Value = i64;

/// Largest code point accepted by `output_character`
pub const MAX_CODEPOINT: Value = 0x10_FFFF;
