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

//! Zero-operand single-byte opcodes, plus `STOP`'s two-byte form.

use super::Encoded;
use crate::ast::Operand;

pub fn encode(mnemonic: &str, ops: &[Operand]) -> Option<Encoded> {
    if !ops.is_empty() {
        return None;
    }
    let bytes = match mnemonic {
        "nop" => vec![0x00],
        "stop" => vec![0x10, 0x00],
        "halt" => vec![0x76],
        "di" => vec![0xF3],
        "ei" => vec![0xFB],
        "ccf" => vec![0x3F],
        "scf" => vec![0x37],
        "daa" => vec![0x27],
        "cpl" => vec![0x2F],
        "rlca" => vec![0x07],
        "rrca" => vec![0x0F],
        "rla" => vec![0x17],
        "rra" => vec![0x1F],
        _ => return None,
    };
    Some(Encoded::fixed(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_two_bytes() {
        assert_eq!(encode("stop", &[]).unwrap().bytes, vec![0x10, 0x00]);
    }

    #[test]
    fn rejects_operands() {
        assert!(encode("nop", &[Operand::Reg8(crate::ast::Reg8::A)]).is_none());
    }
}
