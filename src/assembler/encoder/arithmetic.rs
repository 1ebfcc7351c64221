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

//! 8-bit and 16-bit arithmetic: the `ADD`/`ADC`/`SUB`/`SBC`/`AND`/`XOR`/`OR`/
//! `CP` family against `A`, plus `INC`/`DEC` over both register widths.

use super::common::{reg16_pair_code, reg_field};
use super::Encoded;
use crate::assembler::section::FixupKind;
use crate::ast::{Operand, Reg8};

pub fn encode(mnemonic: &str, ops: &[Operand]) -> Option<Encoded> {
    match mnemonic {
        "inc" | "dec" => encode_inc_dec(mnemonic, ops),
        "add" => encode_add(ops),
        "adc" | "sub" | "sbc" | "and" | "xor" | "or" | "cp" => encode_alu(mnemonic, ops),
        _ => None,
    }
}

fn alu_base(mnemonic: &str) -> u8 {
    match mnemonic {
        "add" => 0b10_000_000,
        "adc" => 0b10_001_000,
        "sub" => 0b10_010_000,
        "sbc" => 0b10_011_000,
        "and" => 0b10_100_000,
        "xor" => 0b10_101_000,
        "or" => 0b10_110_000,
        "cp" => 0b10_111_000,
        _ => unreachable!(),
    }
}

fn alu_immediate_opcode(mnemonic: &str) -> u8 {
    match mnemonic {
        "add" => 0xC6,
        "adc" => 0xCE,
        "sub" => 0xD6,
        "sbc" => 0xDE,
        "and" => 0xE6,
        "xor" => 0xEE,
        "or" => 0xF6,
        "cp" => 0xFE,
        _ => unreachable!(),
    }
}

/// `ADD` also covers `ADD HL,rr` and `ADD SP,e`, which the other seven ALU
/// mnemonics don't have; handled separately so `encode_alu` can stay
/// strictly `A`-destination.
fn encode_add(ops: &[Operand]) -> Option<Encoded> {
    match ops {
        [Operand::Reg16(crate::ast::Reg16::Hl), Operand::Reg16(r)] => {
            let pair = reg16_pair_code(*r)?;
            Some(Encoded::fixed(vec![0b00_001_001 | (pair << 4)]))
        }
        [Operand::Reg16(crate::ast::Reg16::Sp), Operand::Expr(e)] => Some(Encoded::with_operand(
            vec![0xE8],
            e.clone(),
            1,
            FixupKind::Signed8,
        )),
        _ => encode_alu("add", ops),
    }
}

fn encode_alu(mnemonic: &str, ops: &[Operand]) -> Option<Encoded> {
    match ops {
        [Operand::Reg8(Reg8::A), rhs] | [rhs] => {
            if let Some(code) = reg_field(rhs) {
                return Some(Encoded::fixed(vec![alu_base(mnemonic) | code]));
            }
            if let Operand::Expr(e) = rhs {
                return Some(Encoded::with_operand(
                    vec![alu_immediate_opcode(mnemonic)],
                    e.clone(),
                    1,
                    FixupKind::Absolute,
                ));
            }
            None
        }
        _ => None,
    }
}

fn encode_inc_dec(mnemonic: &str, ops: &[Operand]) -> Option<Encoded> {
    let [op] = ops else { return None };
    if let Some(code) = reg_field(op) {
        let base = if mnemonic == "inc" { 0b00_000_100 } else { 0b00_000_101 };
        return Some(Encoded::fixed(vec![base | (code << 3)]));
    }
    if let Operand::Reg16(r) = op {
        let pair = reg16_pair_code(*r)?;
        let base = if mnemonic == "inc" { 0b00_000_011 } else { 0b00_001_011 };
        return Some(Encoded::fixed(vec![base | (pair << 4)]));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Reg16};

    #[test]
    fn add_a_b() {
        let e = encode("add", &[Operand::Reg8(Reg8::A), Operand::Reg8(Reg8::B)]).unwrap();
        assert_eq!(e.bytes, vec![0x80]);
    }

    #[test]
    fn add_hl_bc() {
        let e = encode("add", &[Operand::Reg16(Reg16::Hl), Operand::Reg16(Reg16::Bc)]).unwrap();
        assert_eq!(e.bytes, vec![0x09]);
    }

    #[test]
    fn cp_immediate() {
        let e = encode("cp", &[Operand::Expr(Expr::Int(5))]).unwrap();
        assert_eq!(e.bytes, vec![0xFE]);
        assert_eq!(e.operand.unwrap().1, 1);
    }

    #[test]
    fn inc_hl_indirect() {
        let e = encode(
            "inc",
            &[Operand::Indirect(crate::ast::Indirect::Reg16(Reg16::Hl))],
        )
        .unwrap();
        assert_eq!(e.bytes, vec![0x34]);
    }

    #[test]
    fn dec_bc_pair() {
        let e = encode("dec", &[Operand::Reg16(Reg16::Bc)]).unwrap();
        assert_eq!(e.bytes, vec![0x0B]);
    }
}
