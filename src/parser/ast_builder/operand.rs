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

//! Operand classification (§4.6). Condition codes only exist on
//! `jp`/`jr`/`call`/`ret`, so the bare identifier `"c"` is ambiguous between
//! [`Cond::C`] and [`Reg8::C`] and can only be resolved by the caller telling
//! us which mnemonic it follows, not by the text alone.

use crate::assembler::expression::parse_expr;
use crate::ast::{Cond, Expr, Indirect, Operand, Reg16, Reg8};
use crate::errors::AssemblyError;
use crate::parser::tokenizer::{tokenize, Token};
use crate::parser::Rule;
use pest::iterators::Pair;
use std::rc::Rc;

const CONDITION_MNEMONICS: &[&str] = &["jp", "jr", "call", "ret"];

/// Classifies an instruction operand, aware of the enclosing mnemonic so
/// condition codes are only recognized where the ISA allows them (§4.4).
pub fn build_instruction_operand(
    pair: Pair<Rule>,
    mnemonic: &str,
    file: &Rc<str>,
    line: usize,
) -> Result<Operand, AssemblyError> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::string_lit => Ok(Operand::StringLit(unescape(inner.as_str()))),
        Rule::operand_text => classify_text(inner.as_str().trim(), mnemonic, file, line),
        other => unreachable!("unexpected operand inner rule {other:?}"),
    }
}

/// Classifies a directive/EQU operand. Directives are never opcodes, so bare
/// identifiers are always symbol references, never registers or conditions.
pub fn build_expr_operand(pair: Pair<Rule>, file: &Rc<str>, line: usize) -> Result<Expr, AssemblyError> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::string_lit => Err(AssemblyError::Structural {
            file: file.to_string(),
            line,
            reason: "a string literal cannot be used as a numeric expression".to_string(),
        }),
        Rule::operand_text => parse_full_expr(inner.as_str().trim(), file, line),
        other => unreachable!("unexpected operand inner rule {other:?}"),
    }
}

fn classify_text(text: &str, mnemonic: &str, file: &Rc<str>, line: usize) -> Result<Operand, AssemblyError> {
    if let Some(indirect_text) = strip_brackets(text) {
        return Ok(Operand::Indirect(classify_indirect(indirect_text, file, line)?));
    }

    // `C` is the only name shared between a register and a condition code,
    // so the condition check must run first wherever conditions are legal:
    // checking `Reg8` first would always win and `jp c` could never parse
    // as `Cond::C`.
    if CONDITION_MNEMONICS.contains(&mnemonic) {
        if let Some(cond) = cond_from_name(text) {
            return Ok(Operand::Cond(cond));
        }
    }
    if let Some(reg) = reg8_from_name(text) {
        return Ok(Operand::Reg8(reg));
    }
    if let Some(reg) = reg16_from_name(text) {
        return Ok(Operand::Reg16(reg));
    }
    if let Some(rest) = strip_sp_plus(text) {
        let expr = parse_full_expr(rest, file, line)?;
        return Ok(Operand::SpPlus(expr));
    }

    Ok(Operand::Expr(parse_full_expr(text, file, line)?))
}

fn classify_indirect(text: &str, file: &Rc<str>, line: usize) -> Result<Indirect, AssemblyError> {
    let trimmed = text.trim();
    if let Some(reg) = reg16_from_name(trim_suffix(trimmed, "+").unwrap_or(trimmed)) {
        if trimmed.ends_with('+') {
            return Ok(Indirect::Reg16Inc(reg));
        }
    }
    if let Some(reg) = reg16_from_name(trim_suffix(trimmed, "-").unwrap_or(trimmed)) {
        if trimmed.ends_with('-') {
            return Ok(Indirect::Reg16Dec(reg));
        }
    }
    if trimmed.eq_ignore_ascii_case("hli") {
        return Ok(Indirect::Reg16Inc(Reg16::Hl));
    }
    if trimmed.eq_ignore_ascii_case("hld") {
        return Ok(Indirect::Reg16Dec(Reg16::Hl));
    }
    if let Some(reg) = reg16_from_name(trimmed) {
        return Ok(Indirect::Reg16(reg));
    }
    if let Some(reg) = reg8_from_name(trimmed) {
        if reg == Reg8::C {
            return Ok(Indirect::Reg8(Reg8::C));
        }
    }
    Ok(Indirect::Addr(parse_full_expr(trimmed, file, line)?))
}

fn strip_brackets(text: &str) -> Option<&str> {
    let text = text.trim();
    if (text.starts_with('(') && text.ends_with(')')) || (text.starts_with('[') && text.ends_with(']')) {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

fn trim_suffix<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    text.strip_suffix(suffix)
}

fn strip_sp_plus(text: &str) -> Option<&str> {
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("sp+") {
        Some(&text[3..])
    } else if lower.starts_with("sp +") {
        Some(text["sp".len()..].trim_start().trim_start_matches('+'))
    } else {
        None
    }
}

fn reg8_from_name(text: &str) -> Option<Reg8> {
    match text.to_ascii_uppercase().as_str() {
        "A" => Some(Reg8::A),
        "B" => Some(Reg8::B),
        "C" => Some(Reg8::C),
        "D" => Some(Reg8::D),
        "E" => Some(Reg8::E),
        "H" => Some(Reg8::H),
        "L" => Some(Reg8::L),
        _ => None,
    }
}

fn reg16_from_name(text: &str) -> Option<Reg16> {
    match text.to_ascii_uppercase().as_str() {
        "BC" => Some(Reg16::Bc),
        "DE" => Some(Reg16::De),
        "HL" => Some(Reg16::Hl),
        "SP" => Some(Reg16::Sp),
        "AF" => Some(Reg16::Af),
        _ => None,
    }
}

fn cond_from_name(text: &str) -> Option<Cond> {
    match text.to_ascii_uppercase().as_str() {
        "Z" => Some(Cond::Z),
        "NZ" => Some(Cond::Nz),
        "C" => Some(Cond::C),
        "NC" => Some(Cond::Nc),
        _ => None,
    }
}

pub fn parse_full_expr(text: &str, file: &Rc<str>, line: usize) -> Result<Expr, AssemblyError> {
    let tokens: Vec<Token> = tokenize(text).map_err(|reason| AssemblyError::Lexical {
        file: file.to_string(),
        line,
        reason,
    })?;
    let (expr, next) = parse_expr(&tokens, 0).map_err(|reason| AssemblyError::Structural {
        file: file.to_string(),
        line,
        reason,
    })?;
    if next != tokens.len() {
        return Err(AssemblyError::Structural {
            file: file.to_string(),
            line,
            reason: format!("unexpected trailing tokens in expression \"{text}\""),
        });
    }
    Ok(expr)
}

fn unescape(raw: &str) -> String {
    let inner = raw.trim_start_matches('"').trim_end_matches('"');
    inner.replace("\\\"", "\"").replace("\\n", "\n").replace("\\\\", "\\")
}
