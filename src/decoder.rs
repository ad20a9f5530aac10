use serde::{Deserialize, Serialize};

use crate::instructions::{InstrClass, Mnemonic};
use crate::operand::Operand;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecoderConfig {
    pub emulated: bool, // rewrite emulated forms (br, ret, dint)
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self { emulated: true }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated instruction at {address:#06x}: need {needed} bytes, have {available}")]
    Truncated {
        address: u32,
        needed: usize,
        available: usize,
    },
    #[error("invalid opcode {word:#06x} at {address:#06x}")]
    InvalidOpcode { address: u32, word: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    TruncatedInput,
    InvalidOpcode,
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::Truncated { .. } => DecodeErrorKind::TruncatedInput,
            DecodeError::InvalidOpcode { .. } => DecodeErrorKind::InvalidOpcode,
        }
    }

    pub fn address(&self) -> u32 {
        match *self {
            DecodeError::Truncated { address, .. } | DecodeError::InvalidOpcode { address, .. } => address,
        }
    }
}

/// One decoded instruction. Built in a single step by a decoder and never
/// mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    pub address: u32,
    pub mnemonic: Mnemonic,
    pub class: InstrClass,
    pub src: Option<Operand>,
    pub dst: Option<Operand>,
    pub length: u8, // 2, 4 or 6
    pub emulated: bool,
}

impl Instruction {
    /// A zero-operand emulated form such as `ret` or `dint`.
    pub fn fixed(address: u32, mnemonic: Mnemonic, length: u8) -> Self {
        Self {
            address,
            mnemonic,
            class: InstrClass::None,
            src: None,
            dst: None,
            length,
            emulated: true,
        }
    }

    pub fn next_address(&self) -> u32 {
        self.address.wrapping_add(u32::from(self.length))
    }

    /// Destination of a branch-only instruction. Offsets count words from
    /// the following instruction.
    pub fn branch_target(&self) -> Option<u32> {
        if self.class != InstrClass::BranchOnly {
            return None;
        }
        let offset = self.src?.value?;
        Some(self.address.wrapping_add(2).wrapping_add_signed(offset * 2) & 0xFFFF)
    }
}

pub trait Decoder {
    fn decode(&self, bytes: &[u8], address: u32) -> Result<Instruction, DecodeError>;

    /// Linear sweep over `bytes`. An invalid opcode skips one word; a
    /// truncated tail ends the sweep.
    fn decode_block(&self, bytes: &[u8], start: u32) -> Vec<Result<Instruction, DecodeError>> {
        let mut out = Vec::new();
        let mut offset = 0usize;
        while offset < bytes.len() {
            let address = start.wrapping_add(offset as u32);
            match self.decode(&bytes[offset..], address) {
                Ok(insn) => {
                    offset += usize::from(insn.length);
                    out.push(Ok(insn));
                }
                Err(e @ DecodeError::InvalidOpcode { .. }) => {
                    offset += 2;
                    out.push(Err(e));
                }
                Err(e @ DecodeError::Truncated { .. }) => {
                    out.push(Err(e));
                    break;
                }
            }
        }
        out
    }
}
