use tracing::debug;

use crate::decoder::{DecodeError, Decoder, DecoderConfig, Instruction};
use crate::emulated;
use crate::instructions::classify;
use crate::operand::OperandShape;

/// MSP430 decoder (16-bit core instruction set).
/// Decoding is a pure function of the input bytes, the address and the config.
#[derive(Debug, Clone, Copy, Default)]
pub struct Msp430Decoder {
    pub cfg: DecoderConfig,
}

impl Msp430Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: DecoderConfig) -> Self {
        Self { cfg }
    }
}

#[inline]
fn load_le_u16(bytes: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([bytes[off], bytes[off + 1]])
}

impl Decoder for Msp430Decoder {
    fn decode(&self, bytes: &[u8], address: u32) -> Result<Instruction, DecodeError> {
        if bytes.len() < 2 {
            debug!(address, available = bytes.len(), "no room for an instruction word");
            return Err(DecodeError::Truncated { address, needed: 2, available: bytes.len() });
        }
        let word = load_le_u16(bytes, 0);

        if self.cfg.emulated {
            if let Some(insn) = emulated::fixed_form(word, address) {
                return Ok(insn);
            }
        }

        let Some((mnemonic, class)) = classify(word) else {
            debug!(address, word, "invalid opcode");
            return Err(DecodeError::InvalidOpcode { address, word });
        };

        let src = OperandShape::source(class, word);
        let dst = OperandShape::destination(class, word);

        let length = 2 + src.extra_bytes() + dst.map_or(0, |d| d.extra_bytes());
        if bytes.len() < usize::from(length) {
            debug!(address, needed = length, available = bytes.len(), "truncated instruction");
            return Err(DecodeError::Truncated {
                address,
                needed: usize::from(length),
                available: bytes.len(),
            });
        }

        // Extension words follow the opcode word: source first, then destination.
        let mut off = 2;
        let mut next_ext = |needed: bool| {
            needed.then(|| {
                let w = load_le_u16(bytes, off);
                off += 2;
                w
            })
        };
        let src = src.finish(next_ext(src.mode.needs_extension()));
        let dst = dst.map(|d| d.finish(next_ext(d.mode.needs_extension())));

        let insn = Instruction {
            address,
            mnemonic,
            class,
            src: Some(src),
            dst,
            length,
            emulated: false,
        };

        Ok(if self.cfg.emulated { emulated::normalize(insn) } else { insn })
    }
}
