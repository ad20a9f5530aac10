//! Operand decoding: raw addressing-mode bits, register identity, width,
//! and the register-driven reinterpretation for `pc`, `sr` and `cg`.

use serde::{Deserialize, Serialize};

use crate::instructions::InstrClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Register {
    Pc,
    Sp,
    Sr,
    Cg,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

impl Register {
    pub const ALL: [Register; 16] = [
        Register::Pc,
        Register::Sp,
        Register::Sr,
        Register::Cg,
        Register::R4,
        Register::R5,
        Register::R6,
        Register::R7,
        Register::R8,
        Register::R9,
        Register::R10,
        Register::R11,
        Register::R12,
        Register::R13,
        Register::R14,
        Register::R15,
    ];

    /// Register selected by the low four bits of `field`.
    pub fn from_index(field: u16) -> Register {
        Register::ALL[(field & 0xF) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::Pc => "pc",
            Register::Sp => "sp",
            Register::Sr => "sr",
            Register::Cg => "cg",
            Register::R4 => "r4",
            Register::R5 => "r5",
            Register::R6 => "r6",
            Register::R7 => "r7",
            Register::R8 => "r8",
            Register::R9 => "r9",
            Register::R10 => "r10",
            Register::R11 => "r11",
            Register::R12 => "r12",
            Register::R13 => "r13",
            Register::R14 => "r14",
            Register::R15 => "r15",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Width {
    Byte,
    Word,
}

impl Width {
    /// Bit 6 (B/W) of a two- or one-operand word.
    pub fn from_word(word: u16) -> Width {
        if word & 0x0040 != 0 {
            Width::Byte
        } else {
            Width::Word
        }
    }
}

/// The four addressing modes as literally encoded in As/Ad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawMode {
    Register,
    Indexed,
    IndirectRegister,
    IndirectAutoIncrement,
}

impl RawMode {
    pub fn from_bits(bits: u16) -> RawMode {
        match bits & 0b11 {
            0 => RawMode::Register,
            1 => RawMode::Indexed,
            2 => RawMode::IndirectRegister,
            _ => RawMode::IndirectAutoIncrement,
        }
    }

    /// The mode used when no reinterpretation row applies.
    pub fn literal(self) -> AddrMode {
        match self {
            RawMode::Register => AddrMode::Register,
            RawMode::Indexed => AddrMode::Indexed,
            RawMode::IndirectRegister => AddrMode::IndirectRegister,
            RawMode::IndirectAutoIncrement => AddrMode::IndirectAutoIncrement,
        }
    }
}

/// Resolved addressing mode after register-specific reinterpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddrMode {
    Register,
    Indexed,
    IndirectRegister,
    IndirectAutoIncrement,
    Symbolic,
    Absolute,
    Immediate,
    Constant0,
    Constant1,
    Constant2,
    Constant4,
    Constant8,
    ConstantNeg1,
    /// Signed word offset embedded in a branch-only instruction.
    Offset,
}

impl AddrMode {
    /// Bytes of extension word this mode consumes after the opcode word.
    pub const fn extra_bytes(self) -> u8 {
        match self {
            AddrMode::Indexed | AddrMode::Symbolic | AddrMode::Absolute | AddrMode::Immediate => 2,
            AddrMode::Register
            | AddrMode::IndirectRegister
            | AddrMode::IndirectAutoIncrement
            | AddrMode::Constant0
            | AddrMode::Constant1
            | AddrMode::Constant2
            | AddrMode::Constant4
            | AddrMode::Constant8
            | AddrMode::ConstantNeg1
            | AddrMode::Offset => 0,
        }
    }

    pub const fn needs_extension(self) -> bool {
        self.extra_bytes() != 0
    }

    /// Literal produced by the constant generators.
    pub const fn constant(self) -> Option<i32> {
        match self {
            AddrMode::Constant0 => Some(0),
            AddrMode::Constant1 => Some(1),
            AddrMode::Constant2 => Some(2),
            AddrMode::Constant4 => Some(4),
            AddrMode::Constant8 => Some(8),
            AddrMode::ConstantNeg1 => Some(-1),
            _ => None,
        }
    }
}

/// Which operand slot is being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Source,
    Destination,
}

/// Apply the `pc`/`sr`/`cg` reinterpretation rows to a raw mode.
///
/// Destinations only ever see `Register` or `Indexed`, and only the
/// `sr` + indexed row applies to them.
pub fn resolve_mode(register: Register, raw: RawMode, role: Role) -> AddrMode {
    match (role, register, raw) {
        (Role::Source, Register::Pc, RawMode::Indexed) => AddrMode::Symbolic,
        (Role::Source, Register::Pc, RawMode::IndirectAutoIncrement) => AddrMode::Immediate,
        (Role::Source, Register::Cg, RawMode::Register) => AddrMode::Constant0,
        (Role::Source, Register::Cg, RawMode::Indexed) => AddrMode::Constant1,
        (Role::Source, Register::Cg, RawMode::IndirectRegister) => AddrMode::Constant2,
        (Role::Source, Register::Cg, RawMode::IndirectAutoIncrement) => AddrMode::ConstantNeg1,
        (_, Register::Sr, RawMode::Indexed) => AddrMode::Absolute,
        (Role::Source, Register::Sr, RawMode::IndirectRegister) => AddrMode::Constant4,
        (Role::Source, Register::Sr, RawMode::IndirectAutoIncrement) => AddrMode::Constant8,
        _ => raw.literal(),
    }
}

/// An operand whose mode and register are known but whose extension word,
/// if any, has not been read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandShape {
    pub mode: AddrMode,
    pub register: Option<Register>,
    pub width: Option<Width>,
    /// Value fixed by the instruction word itself (constants, branch offset).
    pub fixed: Option<i32>,
}

impl OperandShape {
    pub fn source(class: InstrClass, word: u16) -> OperandShape {
        match class {
            InstrClass::BranchOnly => {
                let raw = (word & 0x03FF) as i32;
                let offset = if raw & 0x0200 != 0 { raw - 0x0400 } else { raw };
                OperandShape {
                    mode: AddrMode::Offset,
                    register: None,
                    width: None,
                    fixed: Some(offset),
                }
            }
            _ => {
                let register = if class == InstrClass::TwoOperand {
                    Register::from_index(word >> 8)
                } else {
                    Register::from_index(word)
                };
                let raw = RawMode::from_bits(word >> 4);
                let mode = resolve_mode(register, raw, Role::Source);
                OperandShape {
                    mode,
                    register: Some(register),
                    width: Some(Width::from_word(word)),
                    fixed: mode.constant(),
                }
            }
        }
    }

    /// Destination slot; present only for two-operand words.
    pub fn destination(class: InstrClass, word: u16) -> Option<OperandShape> {
        if class != InstrClass::TwoOperand {
            return None;
        }
        let register = Register::from_index(word);
        let raw = if word & 0x0080 != 0 { RawMode::Indexed } else { RawMode::Register };
        Some(OperandShape {
            mode: resolve_mode(register, raw, Role::Destination),
            register: Some(register),
            width: Some(Width::from_word(word)),
            fixed: None,
        })
    }

    pub fn extra_bytes(&self) -> u8 {
        self.mode.extra_bytes()
    }

    /// Complete the operand. `extension` must be `Some` exactly when the
    /// mode consumes an extension word.
    pub fn finish(self, extension: Option<u16>) -> Operand {
        let value = match extension {
            Some(word) => Some(i32::from(word)),
            None => self.fixed,
        };
        Operand {
            mode: self.mode,
            register: self.register,
            width: self.width,
            value,
            extra_bytes: self.mode.extra_bytes(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operand {
    pub mode: AddrMode,
    pub register: Option<Register>,
    pub width: Option<Width>,
    pub value: Option<i32>,
    pub extra_bytes: u8,
}

impl Operand {
    /// Absolute target of a symbolic (PC-relative) operand, wrapped to the
    /// 16-bit address space.
    pub fn symbolic_target(&self, next_address: u32) -> Option<u32> {
        match (self.mode, self.value) {
            (AddrMode::Symbolic, Some(v)) => Some(next_address.wrapping_add(v as u32) & 0xFFFF),
            _ => None,
        }
    }
}
