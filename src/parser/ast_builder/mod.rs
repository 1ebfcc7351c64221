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

mod directive;
mod operand;

use crate::ast::{AssemblyLine, LabelDef, RawInstruction};
use crate::errors::AssemblyError;
use crate::parser::Rule;
use pest::iterators::Pair;
use std::rc::Rc;

pub use operand::build_instruction_operand;

pub fn build_line(
    pair: Pair<Rule>,
    file: &Rc<str>,
    line_number: usize,
) -> Result<AssemblyLine, AssemblyError> {
    let mut label = None;
    let mut directive = None;
    let mut instruction = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::label => label = Some(build_label(inner)),
            Rule::content => {
                for content_inner in inner.into_inner() {
                    match content_inner.as_rule() {
                        Rule::equ_form => {
                            directive = Some(directive::build_equ_form(content_inner, file, line_number)?);
                        }
                        Rule::directive => {
                            directive = Some(directive::build_directive(content_inner, file, line_number)?);
                        }
                        Rule::instruction => {
                            instruction = Some(build_instruction(content_inner, file, line_number)?);
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    Ok(AssemblyLine {
        file: file.clone(),
        line_number,
        label,
        directive,
        instruction,
    })
}

fn build_label(pair: Pair<Rule>) -> LabelDef {
    let text = pair.as_str();
    let exported = text.trim_end().ends_with("::");
    let name = pair.into_inner().next().unwrap().as_str().to_string();
    LabelDef { name, exported }
}

fn build_instruction(
    pair: Pair<Rule>,
    file: &Rc<str>,
    line_number: usize,
) -> Result<RawInstruction, AssemblyError> {
    let mut inner = pair.into_inner();
    let mnemonic = inner.next().unwrap().as_str().to_ascii_lowercase();

    let mut operands = Vec::new();
    if let Some(operand_list) = inner.next() {
        for operand_pair in operand_list.into_inner() {
            operands.push(build_instruction_operand(
                operand_pair,
                &mnemonic,
                file,
                line_number,
            )?);
        }
    }

    Ok(RawInstruction { mnemonic, operands })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Cond, Directive, Operand, Reg8};
    use crate::parser::parse_source;

    fn file() -> Rc<str> {
        Rc::from("t.asm")
    }

    #[test]
    fn condition_code_is_positional() {
        let lines = parse_source("jp c, $100\nld a, c\n", &file()).unwrap();
        let jp = lines[0].instruction.as_ref().unwrap();
        assert_eq!(jp.operands[0], Operand::Cond(Cond::C));
        let ld = lines[1].instruction.as_ref().unwrap();
        assert_eq!(ld.operands[1], Operand::Reg8(Reg8::C));
    }

    #[test]
    fn db_accepts_string_and_bytes() {
        let lines = parse_source("DB \"hi\", $01, $02\n", &file()).unwrap();
        match lines[0].directive.as_ref().unwrap() {
            Directive::Db(items) => assert_eq!(items.len(), 3),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
