//! Output character encoding
//!
//! Packs a code point into its variable-length UTF-8 form. The range check
//! is the caller's job; this only follows the branch structure, so surrogate
//! code points are encoded like any other 3-byte value.

use std::ops::Deref;

/// Encoded bytes of one code point (1 to 4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    buf: [u8; 4],
    len: usize,
}

impl Encoded {
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl Deref for Encoded {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

pub fn encode(codepoint: u32) -> Encoded {
    let cont = |shift: u32| 0x80 | ((codepoint >> shift) & 0x3F) as u8;
    if codepoint <= 0x7F {
        Encoded { buf: [codepoint as u8, 0, 0, 0], len: 1 }
    } else if codepoint <= 0x7FF {
        Encoded {
            buf: [0xC0 | ((codepoint >> 6) & 0x1F) as u8, cont(0), 0, 0],
            len: 2,
        }
    } else if codepoint <= 0xFFFF {
        Encoded {
            buf: [0xE0 | ((codepoint >> 12) & 0x0F) as u8, cont(6), cont(0), 0],
            len: 3,
        }
    } else {
        Encoded {
            buf: [0xF0 | ((codepoint >> 18) & 0x07) as u8, cont(12), cont(6), cont(0)],
            len: 4,
        }
    }
}
