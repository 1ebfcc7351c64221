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

//! `PUSH`/`POP`, the only instructions addressing `AF` as a register pair.

use super::common::reg16_stack_code;
use super::Encoded;
use crate::ast::{Operand, Reg16};

pub fn encode(mnemonic: &str, ops: &[Operand]) -> Option<Encoded> {
    let [Operand::Reg16(r)] = ops else { return None };
    let qq = reg16_stack_code(*r)?;
    let base = match mnemonic {
        "push" => 0b11_000_101,
        "pop" => 0b11_000_001,
        _ => return None,
    };
    Some(Encoded::fixed(vec![base | (qq << 4)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_hl() {
        let e = encode("push", &[Operand::Reg16(Reg16::Hl)]).unwrap();
        assert_eq!(e.bytes, vec![0xE5]);
    }

    #[test]
    fn pop_af() {
        let e = encode("pop", &[Operand::Reg16(Reg16::Af)]).unwrap();
        assert_eq!(e.bytes, vec![0xF1]);
    }

    #[test]
    fn push_sp_is_rejected() {
        assert!(encode("push", &[Operand::Reg16(Reg16::Sp)]).is_none());
    }
}
