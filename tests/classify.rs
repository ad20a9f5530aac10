// Opcode dispatch table checked against the MSP430 family user's guide
// encoding tables, independently of operand decoding.
use msp430_rs::instructions::{classify, InstrClass, Mnemonic, OpcodeEntry, OPCODE_TABLE};

#[test]
fn two_operand_nibbles() {
    let expected = [
        (0x4, Mnemonic::Mov),
        (0x5, Mnemonic::Add),
        (0x6, Mnemonic::Addc),
        (0x7, Mnemonic::Subc),
        (0x8, Mnemonic::Sub),
        (0x9, Mnemonic::Cmp),
        (0xA, Mnemonic::Dadd),
        (0xB, Mnemonic::Bit),
        (0xC, Mnemonic::Bic),
        (0xD, Mnemonic::Bis),
        (0xE, Mnemonic::Xor),
        (0xF, Mnemonic::And),
    ];
    for (nibble, m) in expected {
        let word = (nibble as u16) << 12;
        assert_eq!(classify(word), Some((m, InstrClass::TwoOperand)), "opcode {nibble:#x}");
        // the remaining twelve bits never change the mnemonic
        assert_eq!(classify(word | 0x0FFF), Some((m, InstrClass::TwoOperand)));
    }
}

#[test]
fn one_operand_selector() {
    let expected = [
        (0x1000, Mnemonic::Rrc),
        (0x1080, Mnemonic::Swpb),
        (0x1100, Mnemonic::Rra),
        (0x1180, Mnemonic::Sxt),
        (0x1200, Mnemonic::Push),
        (0x1280, Mnemonic::Call),
        (0x1300, Mnemonic::Reti),
    ];
    for (word, m) in expected {
        assert_eq!(classify(word), Some((m, InstrClass::OneOperand)), "word {word:#06x}");
    }
    assert_eq!(classify(0x1380), None);
    assert_eq!(classify(0x13FF), None);
}

#[test]
fn branch_selectors() {
    let expected = [
        (0x2000, Mnemonic::Jnz),
        (0x2400, Mnemonic::Jz),
        (0x2800, Mnemonic::Jnc),
        (0x2C00, Mnemonic::Jc),
        (0x3000, Mnemonic::Jn),
        (0x3400, Mnemonic::Jge),
        (0x3800, Mnemonic::Jl),
        (0x3C00, Mnemonic::Jmp),
    ];
    for (word, m) in expected {
        assert_eq!(classify(word), Some((m, InstrClass::BranchOnly)), "word {word:#06x}");
        assert_eq!(classify(word | 0x03FF), Some((m, InstrClass::BranchOnly)));
    }
}

#[test]
fn opcode_zero_is_unmapped() {
    assert!(OPCODE_TABLE[0].is_none());
    for low in [0x0000u16, 0x0001, 0x0400, 0x0FFF] {
        assert_eq!(classify(low), None);
    }
}

#[test]
fn selector_tables_have_expected_shape() {
    let shapes: Vec<_> = OPCODE_TABLE[1..4]
        .iter()
        .map(|e| match e {
            Some(OpcodeEntry::Select { mask, shift, mnemonics, .. }) => (*mask, *shift, mnemonics.len()),
            other => panic!("expected selector, got {other:?}"),
        })
        .collect();
    assert_eq!(shapes, vec![(0x0380, 7, 7), (0x0C00, 10, 4), (0x0C00, 10, 4)]);
}
