//! Emulated instructions: bit patterns of real instructions that carry
//! their own conventional mnemonic.

use tracing::trace;

use crate::decoder::Instruction;
use crate::instructions::Mnemonic;
use crate::operand::Register;

/// `mov @sp+, pc`
pub const RET_WORD: u16 = 0x4130;

/// Source value of `bis #0xf0, sr` reported as `dint`.
pub const DINT_SOURCE: i32 = 0x00F0;

/// Fixed-word shorthands recognised before any opcode classification.
pub fn fixed_form(word: u16, address: u32) -> Option<Instruction> {
    match word {
        RET_WORD => Some(Instruction::fixed(address, Mnemonic::Ret, 2)),
        _ => None,
    }
}

/// Rewrite a fully decoded instruction into its emulated form, if it has one.
pub fn normalize(insn: Instruction) -> Instruction {
    let dst_reg = insn.dst.and_then(|d| d.register);
    match (insn.mnemonic, dst_reg) {
        (Mnemonic::Mov, Some(Register::Pc)) => {
            trace!(address = insn.address, "mov into pc rewritten as br");
            Instruction {
                mnemonic: Mnemonic::Br,
                emulated: true,
                ..insn
            }
        }
        (Mnemonic::Bis, Some(Register::Sr))
            if insn.src.and_then(|s| s.value) == Some(DINT_SOURCE) =>
        {
            trace!(address = insn.address, "bis #0xf0, sr rewritten as dint");
            Instruction::fixed(insn.address, Mnemonic::Dint, insn.length)
        }
        _ => insn,
    }
}
