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

//! The `0xCB`-prefixed page: rotate/shift/swap plus `BIT`/`RES`/`SET`.

use super::common::reg_field;
use super::Encoded;
use crate::ast::{Expr, Operand};

fn shift_base(mnemonic: &str) -> Option<u8> {
    Some(match mnemonic {
        "rlc" => 0b00_000_000,
        "rrc" => 0b00_001_000,
        "rl" => 0b00_010_000,
        "rr" => 0b00_011_000,
        "sla" => 0b00_100_000,
        "sra" => 0b00_101_000,
        "swap" => 0b00_110_000,
        "srl" => 0b00_111_000,
        _ => return None,
    })
}

pub fn encode(mnemonic: &str, ops: &[Operand]) -> Option<Encoded> {
    match (mnemonic, ops) {
        ("bit" | "res" | "set", [Operand::Expr(Expr::Int(bit)), r]) => {
            let code = reg_field(r)?;
            let bit = u8::try_from(*bit).ok().filter(|b| *b < 8)?;
            let group = match mnemonic {
                "bit" => 0b01,
                "res" => 0b10,
                "set" => 0b11,
                _ => unreachable!(),
            };
            Some(Encoded::fixed(vec![0xCB, (group << 6) | (bit << 3) | code]))
        }
        (_, [r]) => {
            let base = shift_base(mnemonic)?;
            let code = reg_field(r)?;
            Some(Encoded::fixed(vec![0xCB, base | code]))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Reg8;

    #[test]
    fn bit_7_h() {
        let e = encode(
            "bit",
            &[Operand::Expr(Expr::Int(7)), Operand::Reg8(Reg8::H)],
        )
        .unwrap();
        assert_eq!(e.bytes, vec![0xCB, 0x7C]);
    }

    #[test]
    fn swap_a() {
        let e = encode("swap", &[Operand::Reg8(Reg8::A)]).unwrap();
        assert_eq!(e.bytes, vec![0xCB, 0x37]);
    }

    #[test]
    fn bit_out_of_range_is_rejected() {
        assert!(encode("bit", &[Operand::Expr(Expr::Int(8)), Operand::Reg8(Reg8::A)]).is_none());
    }
}
