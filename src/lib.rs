pub mod decoder;
pub mod emulated;
pub mod instructions;
pub mod operand;

pub mod isa {
    pub mod msp430; // MSP430 (16-bit core, no MSP430X extensions)
}

pub use decoder::{DecodeError, DecodeErrorKind, Decoder, DecoderConfig, Instruction};
pub use instructions::{InstrClass, Mnemonic};
pub use isa::msp430::Msp430Decoder;
pub use operand::{AddrMode, Operand, Register, Width};
