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

//! The 3-bit and 2-bit register/condition field encodings shared by every
//! opcode-table module (the same tables the LR35902 decoder itself uses).

use crate::ast::{Cond, Indirect, Operand, Reg16, Reg8};

/// The `r` field used throughout the unprefixed and CB-prefixed pages:
/// B C D E H L (HL) A, in that numeric order, with `(HL)` at slot 6.
pub fn reg_field(op: &Operand) -> Option<u8> {
    match op {
        Operand::Reg8(r) => Some(reg8_code(*r)),
        Operand::Indirect(Indirect::Reg16(Reg16::Hl)) => Some(6),
        _ => None,
    }
}

pub fn reg8_code(r: Reg8) -> u8 {
    match r {
        Reg8::B => 0,
        Reg8::C => 1,
        Reg8::D => 2,
        Reg8::E => 3,
        Reg8::H => 4,
        Reg8::L => 5,
        Reg8::A => 7,
    }
}

/// The `dd`/`rr` field for 16-bit load/inc/dec/add-HL forms: BC DE HL SP.
pub fn reg16_pair_code(r: Reg16) -> Option<u8> {
    match r {
        Reg16::Bc => Some(0),
        Reg16::De => Some(1),
        Reg16::Hl => Some(2),
        Reg16::Sp => Some(3),
        Reg16::Af => None,
    }
}

/// The `qq` field for PUSH/POP: BC DE HL AF.
pub fn reg16_stack_code(r: Reg16) -> Option<u8> {
    match r {
        Reg16::Bc => Some(0),
        Reg16::De => Some(1),
        Reg16::Hl => Some(2),
        Reg16::Af => Some(3),
        Reg16::Sp => None,
    }
}

/// The `cc` field used by `JP`/`CALL`/`RET`: NZ Z NC C.
pub fn cond_code(c: Cond) -> u8 {
    match c {
        Cond::Nz => 0,
        Cond::Z => 1,
        Cond::Nc => 2,
        Cond::C => 3,
    }
}
