use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mnemonic {
    // Two-operand (opcodes 0x4..=0xF)
    Mov,
    Add,
    Addc,
    Subc,
    Sub,
    Cmp,
    Dadd,
    Bit,
    Bic,
    Bis,
    Xor,
    And,
    // One-operand (opcode 0x1)
    Rrc,
    Swpb,
    Rra,
    Sxt,
    Push,
    Call,
    Reti,
    // Branch-only (opcodes 0x2, 0x3)
    Jnz,
    Jz,
    Jnc,
    Jc,
    Jn,
    Jge,
    Jl,
    Jmp,
    // Emulated forms
    Br,
    Ret,
    Dint,
}

impl Mnemonic {
    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Mov => "mov",
            Mnemonic::Add => "add",
            Mnemonic::Addc => "addc",
            Mnemonic::Subc => "subc",
            Mnemonic::Sub => "sub",
            Mnemonic::Cmp => "cmp",
            Mnemonic::Dadd => "dadd",
            Mnemonic::Bit => "bit",
            Mnemonic::Bic => "bic",
            Mnemonic::Bis => "bis",
            Mnemonic::Xor => "xor",
            Mnemonic::And => "and",
            Mnemonic::Rrc => "rrc",
            Mnemonic::Swpb => "swpb",
            Mnemonic::Rra => "rra",
            Mnemonic::Sxt => "sxt",
            Mnemonic::Push => "push",
            Mnemonic::Call => "call",
            Mnemonic::Reti => "reti",
            Mnemonic::Jnz => "jnz",
            Mnemonic::Jz => "jz",
            Mnemonic::Jnc => "jnc",
            Mnemonic::Jc => "jc",
            Mnemonic::Jn => "jn",
            Mnemonic::Jge => "jge",
            Mnemonic::Jl => "jl",
            Mnemonic::Jmp => "jmp",
            Mnemonic::Br => "br",
            Mnemonic::Ret => "ret",
            Mnemonic::Dint => "dint",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural shape of an encoding, selected by the top opcode nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrClass {
    TwoOperand,
    OneOperand,
    BranchOnly,
    /// Fixed-form emulated instructions (`ret`, `dint`) that carry no operands.
    None,
}

/// One slot of the nibble-indexed dispatch table.
#[derive(Debug, Clone, Copy)]
pub enum OpcodeEntry {
    Direct(Mnemonic, InstrClass),
    Select {
        mask: u16,
        shift: u8,
        class: InstrClass,
        mnemonics: &'static [Mnemonic],
    },
}

const ONE_OPERAND: &[Mnemonic] = &[
    Mnemonic::Rrc,
    Mnemonic::Swpb,
    Mnemonic::Rra,
    Mnemonic::Sxt,
    Mnemonic::Push,
    Mnemonic::Call,
    Mnemonic::Reti,
];

const JUMPS_LOW: &[Mnemonic] = &[Mnemonic::Jnz, Mnemonic::Jz, Mnemonic::Jnc, Mnemonic::Jc];
const JUMPS_HIGH: &[Mnemonic] = &[Mnemonic::Jn, Mnemonic::Jge, Mnemonic::Jl, Mnemonic::Jmp];

const fn two(m: Mnemonic) -> Option<OpcodeEntry> {
    Some(OpcodeEntry::Direct(m, InstrClass::TwoOperand))
}

/// Indexed by bits 15..12 of the instruction word.
pub const OPCODE_TABLE: [Option<OpcodeEntry>; 16] = [
    None,
    Some(OpcodeEntry::Select {
        mask: 0x0380,
        shift: 7,
        class: InstrClass::OneOperand,
        mnemonics: ONE_OPERAND,
    }),
    Some(OpcodeEntry::Select {
        mask: 0x0C00,
        shift: 10,
        class: InstrClass::BranchOnly,
        mnemonics: JUMPS_LOW,
    }),
    Some(OpcodeEntry::Select {
        mask: 0x0C00,
        shift: 10,
        class: InstrClass::BranchOnly,
        mnemonics: JUMPS_HIGH,
    }),
    two(Mnemonic::Mov),
    two(Mnemonic::Add),
    two(Mnemonic::Addc),
    two(Mnemonic::Subc),
    two(Mnemonic::Sub),
    two(Mnemonic::Cmp),
    two(Mnemonic::Dadd),
    two(Mnemonic::Bit),
    two(Mnemonic::Bic),
    two(Mnemonic::Bis),
    two(Mnemonic::Xor),
    two(Mnemonic::And),
];

/// Map an instruction word to its mnemonic and class.
///
/// Returns `None` for opcode nibble 0 and for selector values with no
/// mnemonic (e.g. the eighth one-operand slot).
pub fn classify(word: u16) -> Option<(Mnemonic, InstrClass)> {
    let opcode = (word >> 12) as usize;
    match OPCODE_TABLE[opcode]? {
        OpcodeEntry::Direct(m, class) => Some((m, class)),
        OpcodeEntry::Select {
            mask,
            shift,
            class,
            mnemonics,
        } => {
            let sel = ((word & mask) >> shift) as usize;
            mnemonics.get(sel).map(|&m| (m, class))
        }
    }
}
