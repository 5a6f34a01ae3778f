//! Opcode Definitions
//!
//! Defines the operation set a driver issues against the runtime.
//! Discriminants are the byte values stored in compiled bytecode; the jump
//! family occupies the top of the byte range.

/// Operation codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // Arithmetic
    Div = 0x02,
    Add = 0x03,
    Mul = 0x04,
    Mod = 0x05,
    Cmp = 0x0C,
    Sub = 0x10,

    // Storage
    Pop  = 0x06,
    Push = 0x07,
    Dup  = 0x08,
    Sel  = 0x09,
    Mov  = 0x0A,
    Swap = 0x11,

    // I/O
    PopNum   = 0x13,
    PopChar  = 0x14,
    PushNum  = 0x15,
    PushChar = 0x16,

    // Control flow
    Brz    = 0x0E,
    Halt   = 0x12,
    BrPop2 = 0xFD,
    BrPop1 = 0xFE,
    Jmp    = 0xFF,
}

impl OpCode {
    pub const ALL: [OpCode; 21] = [
        OpCode::Div,
        OpCode::Add,
        OpCode::Mul,
        OpCode::Mod,
        OpCode::Pop,
        OpCode::Push,
        OpCode::Dup,
        OpCode::Sel,
        OpCode::Mov,
        OpCode::Cmp,
        OpCode::Brz,
        OpCode::Sub,
        OpCode::Swap,
        OpCode::Halt,
        OpCode::PopNum,
        OpCode::PopChar,
        OpCode::PushNum,
        OpCode::PushChar,
        OpCode::BrPop2,
        OpCode::BrPop1,
        OpCode::Jmp,
    ];

    /// Convert raw byte to opcode
    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| *op as u8 == byte)
    }

    /// Assembly mnemonic
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Div => "DIV",
            OpCode::Add => "ADD",
            OpCode::Mul => "MUL",
            OpCode::Mod => "MOD",
            OpCode::Pop => "POP",
            OpCode::Push => "PUSH",
            OpCode::Dup => "DUP",
            OpCode::Sel => "SEL",
            OpCode::Mov => "MOV",
            OpCode::Cmp => "CMP",
            OpCode::Brz => "BRZ",
            OpCode::Sub => "SUB",
            OpCode::Swap => "SWAP",
            OpCode::Halt => "HALT",
            OpCode::PopNum => "POPNUM",
            OpCode::PopChar => "POPCHAR",
            OpCode::PushNum => "PUSHNUM",
            OpCode::PushChar => "PUSHCHAR",
            OpCode::BrPop2 => "BRPOP2",
            OpCode::BrPop1 => "BRPOP1",
            OpCode::Jmp => "JMP",
        }
    }

    /// Look up a mnemonic, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }

    pub fn has_operand(self) -> bool {
        matches!(self, OpCode::Push | OpCode::Sel | OpCode::Mov) || self.is_jump()
    }

    /// Operand is an instruction index
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            OpCode::Brz | OpCode::BrPop1 | OpCode::BrPop2 | OpCode::Jmp
        )
    }
}
