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

//! `JP`/`JR`/`CALL`/`RET`/`RETI`/`RST`. `JR`'s displacement is the one
//! IP-relative fixup on this ISA (§4.8); every other form here is absolute.

use super::common::cond_code;
use super::Encoded;
use crate::assembler::section::FixupKind;
use crate::ast::{Expr, Indirect, Operand, Reg16};

const LEGAL_RST_TARGETS: [i64; 8] = [0x00, 0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38];

pub fn encode(mnemonic: &str, ops: &[Operand]) -> Option<Encoded> {
    match mnemonic {
        "jp" => encode_jp(ops),
        "jr" => encode_jr(ops),
        "call" => encode_call(ops),
        "ret" => encode_ret(ops),
        "reti" => ops.is_empty().then(|| Encoded::fixed(vec![0xD9])),
        "rst" => encode_rst(ops),
        _ => None,
    }
}

fn encode_jp(ops: &[Operand]) -> Option<Encoded> {
    match ops {
        [Operand::Indirect(Indirect::Reg16(Reg16::Hl))] | [Operand::Reg16(Reg16::Hl)] => {
            Some(Encoded::fixed(vec![0xE9]))
        }
        [Operand::Expr(e)] => Some(Encoded::with_operand(vec![0xC3], e.clone(), 2, FixupKind::Absolute)),
        [Operand::Cond(c), Operand::Expr(e)] => Some(Encoded::with_operand(
            vec![0b11_000_010 | (cond_code(*c) << 3)],
            e.clone(),
            2,
            FixupKind::Absolute,
        )),
        _ => None,
    }
}

fn encode_jr(ops: &[Operand]) -> Option<Encoded> {
    match ops {
        [Operand::Expr(e)] => Some(Encoded::with_operand(vec![0x18], e.clone(), 1, FixupKind::Relative8)),
        [Operand::Cond(c), Operand::Expr(e)] => Some(Encoded::with_operand(
            vec![0b001_00_000 | (cond_code(*c) << 3)],
            e.clone(),
            1,
            FixupKind::Relative8,
        )),
        _ => None,
    }
}

fn encode_call(ops: &[Operand]) -> Option<Encoded> {
    match ops {
        [Operand::Expr(e)] => Some(Encoded::with_operand(vec![0xCD], e.clone(), 2, FixupKind::Absolute)),
        [Operand::Cond(c), Operand::Expr(e)] => Some(Encoded::with_operand(
            vec![0b11_000_100 | (cond_code(*c) << 3)],
            e.clone(),
            2,
            FixupKind::Absolute,
        )),
        _ => None,
    }
}

fn encode_ret(ops: &[Operand]) -> Option<Encoded> {
    match ops {
        [] => Some(Encoded::fixed(vec![0xC9])),
        [Operand::Cond(c)] => Some(Encoded::fixed(vec![0b11_000_000 | (cond_code(*c) << 3)])),
        _ => None,
    }
}

/// `RST` only admits the eight page-zero targets; anything else is a
/// structural error rather than an encoded-but-wrong opcode (§4.6 edge case).
fn encode_rst(ops: &[Operand]) -> Option<Encoded> {
    let [Operand::Expr(Expr::Int(target))] = ops else {
        return None;
    };
    let slot = LEGAL_RST_TARGETS.iter().position(|t| t == target)?;
    Some(Encoded::fixed(vec![0b11_000_111 | ((slot as u8) << 3)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Cond;

    #[test]
    fn jp_absolute() {
        let e = encode("jp", &[Operand::Expr(Expr::Int(0x0150))]).unwrap();
        assert_eq!(e.bytes, vec![0xC3]);
        assert_eq!(e.operand.unwrap().1, 2);
    }

    #[test]
    fn jp_hl_has_no_operand_bytes() {
        let e = encode("jp", &[Operand::Reg16(Reg16::Hl)]).unwrap();
        assert_eq!(e.bytes, vec![0xE9]);
        assert!(e.operand.is_none());
    }

    #[test]
    fn jr_z_is_relative() {
        let e = encode("jr", &[Operand::Cond(Cond::Z), Operand::Expr(Expr::Int(0))]).unwrap();
        assert_eq!(e.bytes, vec![0x28]);
        assert_eq!(e.operand.unwrap().2, FixupKind::Relative8);
    }

    #[test]
    fn rst_rejects_illegal_target() {
        assert!(encode_rst(&[Operand::Expr(Expr::Int(0x05))]).is_none());
    }

    #[test]
    fn rst_legal_target() {
        let e = encode("rst", &[Operand::Expr(Expr::Int(0x18))]).unwrap();
        assert_eq!(e.bytes, vec![0xDF]);
    }
}
