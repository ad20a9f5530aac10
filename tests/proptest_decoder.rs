//! Property-based tests over arbitrary instruction bytes.

use proptest::prelude::*;

use msp430_rs::{DecodeErrorKind, Decoder, InstrClass, Msp430Decoder};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5000))]

    /// Decoding arbitrary bytes never panics.
    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..8), addr in any::<u32>()) {
        let _ = Msp430Decoder::new().decode(&bytes, addr);
    }

    /// Successful decodes have a valid length that fits the input and, for
    /// operand-carrying classes, matches the operands' extension words.
    #[test]
    fn length_is_consistent(bytes in prop::collection::vec(any::<u8>(), 2..8)) {
        if let Ok(insn) = Msp430Decoder::new().decode(&bytes, 0x4400) {
            prop_assert!(matches!(insn.length, 2 | 4 | 6));
            prop_assert!(usize::from(insn.length) <= bytes.len());
            if insn.class != InstrClass::None {
                let extras = insn.src.map_or(0, |s| s.extra_bytes) + insn.dst.map_or(0, |d| d.extra_bytes);
                prop_assert_eq!(insn.length, 2 + extras);
            }
            prop_assert_eq!(insn.dst.is_some(), insn.class == InstrClass::TwoOperand);
        }
    }

    /// Extra-word count is a pure function of the resolved mode.
    #[test]
    fn extra_bytes_follow_mode(bytes in prop::collection::vec(any::<u8>(), 6..7)) {
        if let Ok(insn) = Msp430Decoder::new().decode(&bytes, 0) {
            for op in insn.src.iter().chain(insn.dst.iter()) {
                prop_assert_eq!(op.extra_bytes, op.mode.extra_bytes());
            }
        }
    }

    /// Same input, same output.
    #[test]
    fn decode_is_deterministic(bytes in prop::collection::vec(any::<u8>(), 0..8), addr in any::<u32>()) {
        let dec = Msp430Decoder::new();
        prop_assert_eq!(dec.decode(&bytes, addr), dec.decode(&bytes, addr));
    }

    /// The decoded record carries the requested address.
    #[test]
    fn address_is_preserved(bytes in prop::collection::vec(any::<u8>(), 6..7), addr in any::<u32>()) {
        if let Ok(insn) = Msp430Decoder::new().decode(&bytes, addr) {
            prop_assert_eq!(insn.address, addr);
        }
    }

    /// Opcode nibble 0 is always invalid.
    #[test]
    fn opcode_zero_is_invalid(low in 0u16..0x1000, tail in prop::collection::vec(any::<u8>(), 0..4)) {
        let mut bytes = low.to_le_bytes().to_vec();
        bytes.extend(tail);
        let err = Msp430Decoder::new().decode(&bytes, 0).unwrap_err();
        prop_assert_eq!(err.kind(), DecodeErrorKind::InvalidOpcode);
    }

    /// A single byte is never enough.
    #[test]
    fn one_byte_is_truncated(b in any::<u8>()) {
        let err = Msp430Decoder::new().decode(&[b], 0).unwrap_err();
        prop_assert_eq!(err.kind(), DecodeErrorKind::TruncatedInput);
    }

    /// Dropping the last byte of any multi-word instruction truncates it.
    #[test]
    fn short_buffer_is_truncated(bytes in prop::collection::vec(any::<u8>(), 6..7)) {
        let dec = Msp430Decoder::new();
        if let Ok(insn) = dec.decode(&bytes, 0) {
            let len = usize::from(insn.length);
            if len > 2 {
                let err = dec.decode(&bytes[..len - 1], 0).unwrap_err();
                prop_assert_eq!(err.kind(), DecodeErrorKind::TruncatedInput);
            }
        }
    }
}
