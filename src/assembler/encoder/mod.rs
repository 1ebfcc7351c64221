/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! The instruction encoder (§4.6-§4.8): maps a mnemonic plus its operands'
//! *shapes* to the LR35902 opcode table. Operand *values* are never looked
//! at here — only their syntactic shape (register, indirect form, condition,
//! or bare expression) decides the opcode and the width of any trailing
//! immediate, per the no-size-from-value rule (§9). Every expression operand
//! becomes a queued fixup; resolution and range-checking happen in one place,
//! [`crate::assembler::fixup::resolve`].

mod arithmetic;
mod bitwise;
mod common;
mod control_flow;
mod load_store;
mod misc;
mod stack;

use crate::assembler::section::FixupKind;
use crate::ast::{Expr, RawInstruction};
use crate::errors::AssemblyError;

/// The fixed opcode bytes for an instruction, plus the one deferred operand
/// it may carry. An instruction never has more than one fixup-worthy operand
/// on this ISA (the rare two-operand forms pair a register with an
/// immediate, and the register contributes no bytes of its own).
#[derive(Debug)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub operand: Option<(Expr, u8, FixupKind)>,
}

impl Encoded {
    fn fixed(bytes: Vec<u8>) -> Self {
        Encoded { bytes, operand: None }
    }

    fn with_operand(bytes: Vec<u8>, expr: Expr, width: u8, kind: FixupKind) -> Self {
        Encoded {
            bytes,
            operand: Some((expr, width, kind)),
        }
    }

    /// Total instruction length in bytes, the only thing the symbol-table
    /// pass needs.
    pub fn len(&self) -> u32 {
        self.bytes.len() as u32 + self.operand.as_ref().map_or(0, |(_, w, _)| *w as u32)
    }
}

/// Resolves `instruction` against the opcode table. Unrecognized
/// (mnemonic, operand-shape) pairs are a structural error, not a panic: a
/// typo'd mnemonic or a register where an immediate belongs is a normal
/// authoring mistake.
pub fn encode(
    instruction: &RawInstruction,
    file: &str,
    line: usize,
) -> Result<Encoded, AssemblyError> {
    let mnemonic = instruction.mnemonic.as_str();
    let ops = &instruction.operands;

    let result = match mnemonic {
        "nop" | "halt" | "stop" | "di" | "ei" | "ccf" | "scf" | "daa" | "cpl" | "rlca" | "rrca"
        | "rla" | "rra" => misc::encode(mnemonic, ops),
        "ld" | "ldh" | "ldhl" => load_store::encode(mnemonic, ops),
        "add" | "adc" | "sub" | "sbc" | "and" | "or" | "xor" | "cp" | "inc" | "dec" => {
            arithmetic::encode(mnemonic, ops)
        }
        "rlc" | "rrc" | "rl" | "rr" | "sla" | "sra" | "srl" | "swap" | "bit" | "res" | "set" => {
            bitwise::encode(mnemonic, ops)
        }
        "jp" | "jr" | "call" | "ret" | "reti" | "rst" => control_flow::encode(mnemonic, ops),
        "push" | "pop" => stack::encode(mnemonic, ops),
        _ => None,
    };

    result.ok_or_else(|| AssemblyError::Structural {
        file: file.to_string(),
        line,
        reason: format!("no encoding for \"{mnemonic}\" with the given operands"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operand;

    fn instr(mnemonic: &str, operands: Vec<Operand>) -> RawInstruction {
        RawInstruction {
            mnemonic: mnemonic.to_string(),
            operands,
        }
    }

    #[test]
    fn nop_is_one_byte() {
        let e = encode(&instr("nop", vec![]), "t.asm", 1).unwrap();
        assert_eq!(e.bytes, vec![0x00]);
        assert_eq!(e.len(), 1);
    }

    #[test]
    fn unknown_instruction_is_structural_error() {
        let err = encode(&instr("frobnicate", vec![]), "t.asm", 1).unwrap_err();
        assert!(matches!(err, AssemblyError::Structural { .. }));
    }
}
