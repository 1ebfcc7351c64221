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

//! `LD`, `LDH`, `LDHL`: the widest mnemonic family on this ISA, spanning
//! register-to-register moves, the four `(HL+/-)`/`(BC)`/`(DE)` indirect
//! forms, the `$FF00`-relative `LDH` page, and the two `SP`-adjusting forms.

use super::common::{reg16_pair_code, reg_field};
use super::Encoded;
use crate::assembler::section::FixupKind;
use crate::ast::{Indirect, Operand, Reg16, Reg8};

pub fn encode(mnemonic: &str, ops: &[Operand]) -> Option<Encoded> {
    match (mnemonic, ops) {
        ("ldhl", [Operand::Reg16(Reg16::Sp), Operand::Expr(e)]) => Some(Encoded::with_operand(
            vec![0xF8],
            e.clone(),
            1,
            FixupKind::Signed8,
        )),

        ("ld" | "ldh", [a, b]) => encode_ld(mnemonic, a, b),

        _ => None,
    }
}

fn encode_ld(mnemonic: &str, dst: &Operand, src: &Operand) -> Option<Encoded> {
    if mnemonic == "ldh" {
        return encode_ldh(dst, src);
    }

    // LD (C),A / LD A,(C): RGBDS accepts this spelling as a synonym for LDH.
    if let Some(e) = encode_ldh_c(dst, src) {
        return Some(e);
    }

    if let (Some(d), Some(s)) = (reg_field(dst), reg_field(src)) {
        if d == 6 && s == 6 {
            return None; // (HL),(HL) is not a valid operand pair; HALT owns 0x76.
        }
        return Some(Encoded::fixed(vec![0x40 | (d << 3) | s]));
    }

    if let (Some(d), Operand::Expr(e)) = (reg_field(dst), src) {
        return Some(Encoded::with_operand(
            vec![0x06 | (d << 3)],
            e.clone(),
            1,
            FixupKind::Absolute,
        ));
    }

    match (dst, src) {
        (Operand::Reg8(Reg8::A), Operand::Indirect(Indirect::Reg16(Reg16::Bc))) => {
            Some(Encoded::fixed(vec![0x0A]))
        }
        (Operand::Reg8(Reg8::A), Operand::Indirect(Indirect::Reg16(Reg16::De))) => {
            Some(Encoded::fixed(vec![0x1A]))
        }
        (Operand::Indirect(Indirect::Reg16(Reg16::Bc)), Operand::Reg8(Reg8::A)) => {
            Some(Encoded::fixed(vec![0x02]))
        }
        (Operand::Indirect(Indirect::Reg16(Reg16::De)), Operand::Reg8(Reg8::A)) => {
            Some(Encoded::fixed(vec![0x12]))
        }
        (Operand::Reg8(Reg8::A), Operand::Indirect(Indirect::Reg16Inc(Reg16::Hl))) => {
            Some(Encoded::fixed(vec![0x2A]))
        }
        (Operand::Indirect(Indirect::Reg16Inc(Reg16::Hl)), Operand::Reg8(Reg8::A)) => {
            Some(Encoded::fixed(vec![0x22]))
        }
        (Operand::Reg8(Reg8::A), Operand::Indirect(Indirect::Reg16Dec(Reg16::Hl))) => {
            Some(Encoded::fixed(vec![0x3A]))
        }
        (Operand::Indirect(Indirect::Reg16Dec(Reg16::Hl)), Operand::Reg8(Reg8::A)) => {
            Some(Encoded::fixed(vec![0x32]))
        }
        (Operand::Reg8(Reg8::A), Operand::Indirect(Indirect::Addr(e))) => Some(Encoded::with_operand(
            vec![0xFA],
            e.clone(),
            2,
            FixupKind::Absolute,
        )),
        (Operand::Indirect(Indirect::Addr(e)), Operand::Reg8(Reg8::A)) => Some(Encoded::with_operand(
            vec![0xEA],
            e.clone(),
            2,
            FixupKind::Absolute,
        )),
        (Operand::Reg16(r), Operand::Expr(e)) => {
            let pair = reg16_pair_code(*r)?;
            Some(Encoded::with_operand(
                vec![0x01 | (pair << 4)],
                e.clone(),
                2,
                FixupKind::Absolute,
            ))
        }
        (Operand::Reg16(Reg16::Sp), Operand::Reg16(Reg16::Hl)) => Some(Encoded::fixed(vec![0xF9])),
        (Operand::Indirect(Indirect::Addr(e)), Operand::Reg16(Reg16::Sp)) => Some(Encoded::with_operand(
            vec![0x08],
            e.clone(),
            2,
            FixupKind::Absolute,
        )),
        (Operand::Reg16(Reg16::Hl), Operand::SpPlus(e)) => Some(Encoded::with_operand(
            vec![0xF8],
            e.clone(),
            1,
            FixupKind::Signed8,
        )),
        _ => None,
    }
}

fn encode_ldh_c(dst: &Operand, src: &Operand) -> Option<Encoded> {
    match (dst, src) {
        (Operand::Reg8(Reg8::A), Operand::Indirect(Indirect::Reg8(Reg8::C))) => {
            Some(Encoded::fixed(vec![0xF2]))
        }
        (Operand::Indirect(Indirect::Reg8(Reg8::C)), Operand::Reg8(Reg8::A)) => {
            Some(Encoded::fixed(vec![0xE2]))
        }
        _ => None,
    }
}

fn encode_ldh(dst: &Operand, src: &Operand) -> Option<Encoded> {
    if let Some(e) = encode_ldh_c(dst, src) {
        return Some(e);
    }
    match (dst, src) {
        (Operand::Reg8(Reg8::A), Operand::Indirect(Indirect::Addr(e))) => Some(Encoded::with_operand(
            vec![0xF0],
            e.clone(),
            1,
            FixupKind::Absolute,
        )),
        (Operand::Indirect(Indirect::Addr(e)), Operand::Reg8(Reg8::A)) => Some(Encoded::with_operand(
            vec![0xE0],
            e.clone(),
            1,
            FixupKind::Absolute,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    #[test]
    fn ld_hl_immediate16() {
        let e = encode("ld", &[Operand::Reg16(Reg16::Hl), Operand::Expr(Expr::Int(0xFFDC))]).unwrap();
        assert_eq!(e.bytes, vec![0x21]);
        let (expr, width, kind) = e.operand.unwrap();
        assert_eq!(expr, Expr::Int(0xFFDC));
        assert_eq!(width, 2);
        assert_eq!(kind, FixupKind::Absolute);
    }

    #[test]
    fn ld_a_b_is_reg_to_reg() {
        let e = encode("ld", &[Operand::Reg8(Reg8::A), Operand::Reg8(Reg8::B)]).unwrap();
        assert_eq!(e.bytes, vec![0x78]);
    }

    #[test]
    fn ld_hl_indirect_a() {
        let e = encode(
            "ld",
            &[
                Operand::Indirect(Indirect::Reg16(Reg16::Hl)),
                Operand::Reg8(Reg8::A),
            ],
        )
        .unwrap();
        assert_eq!(e.bytes, vec![0x77]);
    }

    #[test]
    fn ldh_offset_form() {
        let e = encode(
            "ldh",
            &[
                Operand::Indirect(Indirect::Addr(Expr::Int(0x44))),
                Operand::Reg8(Reg8::A),
            ],
        )
        .unwrap();
        assert_eq!(e.bytes, vec![0xE0]);
    }

    #[test]
    fn ld_hl_sp_plus_is_signed8() {
        let e = encode(
            "ld",
            &[Operand::Reg16(Reg16::Hl), Operand::SpPlus(Expr::Int(-2))],
        )
        .unwrap();
        assert_eq!(e.bytes, vec![0xF8]);
        assert_eq!(e.operand.unwrap().2, FixupKind::Signed8);
    }
}
