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

//! Directive construction (§4.5): `SECTION`, `DB`/`DW`/`DS`, `EQU`/`DEF`,
//! `INCLUDE`.

use super::operand::{build_expr_operand, parse_full_expr};
use crate::ast::{DbItem, Directive, Region};
use crate::errors::AssemblyError;
use crate::parser::Rule;
use pest::iterators::Pair;
use std::rc::Rc;

pub fn build_equ_form(pair: Pair<Rule>, file: &Rc<str>, line: usize) -> Result<Directive, AssemblyError> {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let value_pair = inner.next().unwrap();
    let value = build_expr_operand(value_pair, file, line)?;
    Ok(Directive::Equ { name, value })
}

pub fn build_directive(pair: Pair<Rule>, file: &Rc<str>, line: usize) -> Result<Directive, AssemblyError> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::section_directive => build_section(inner, file, line),
        Rule::db_directive => build_db(inner, file, line),
        Rule::dw_directive => build_dw(inner, file, line),
        Rule::ds_directive => build_ds(inner, file, line),
        Rule::def_directive => build_def(inner, file, line),
        Rule::include_directive => build_include(inner),
        other => unreachable!("unexpected directive inner rule {other:?}"),
    }
}

fn build_section(pair: Pair<Rule>, file: &Rc<str>, line: usize) -> Result<Directive, AssemblyError> {
    let mut inner = pair.into_inner();
    let name_pair = inner.next().unwrap();
    let name = string_lit_value(name_pair);
    let region_pair = inner.next().unwrap();
    let region_name = region_pair.as_str();
    let region = Region::from_name(region_name).ok_or_else(|| AssemblyError::Structural {
        file: file.to_string(),
        line,
        reason: format!("unknown section region \"{region_name}\""),
    })?;

    let bank = match inner.next() {
        Some(bank_spec) => {
            let bracket_text = bank_spec.into_inner().next().unwrap();
            Some(parse_full_expr(bracket_text.as_str().trim(), file, line)?)
        }
        None => None,
    };

    if bank.is_some() && region != Region::RomX {
        return Err(AssemblyError::Structural {
            file: file.to_string(),
            line,
            reason: format!("BANK[] is only valid on ROMX sections, not {region_name}"),
        });
    }

    Ok(Directive::Section { name, region, bank })
}

fn build_db(pair: Pair<Rule>, file: &Rc<str>, line: usize) -> Result<Directive, AssemblyError> {
    let mut items = Vec::new();
    let operand_list = pair.into_inner().next().unwrap();
    for operand in operand_list.into_inner() {
        items.push(build_db_item(operand, file, line)?);
    }
    Ok(Directive::Db(items))
}

fn build_db_item(pair: Pair<Rule>, file: &Rc<str>, line: usize) -> Result<DbItem, AssemblyError> {
    let inner = pair.clone().into_inner().next().unwrap();
    if inner.as_rule() == Rule::string_lit {
        return Ok(DbItem::Str(string_lit_value(inner)));
    }
    Ok(DbItem::Value(build_expr_operand(pair, file, line)?))
}

fn build_dw(pair: Pair<Rule>, file: &Rc<str>, line: usize) -> Result<Directive, AssemblyError> {
    let mut values = Vec::new();
    let operand_list = pair.into_inner().next().unwrap();
    for operand in operand_list.into_inner() {
        values.push(build_expr_operand(operand, file, line)?);
    }
    Ok(Directive::Dw(values))
}

fn build_ds(pair: Pair<Rule>, file: &Rc<str>, line: usize) -> Result<Directive, AssemblyError> {
    let mut inner = pair.into_inner();
    let count = build_expr_operand(inner.next().unwrap(), file, line)?;
    let fill = match inner.next() {
        Some(p) => Some(build_expr_operand(p, file, line)?),
        None => None,
    };
    Ok(Directive::Ds { count, fill })
}

fn build_def(pair: Pair<Rule>, file: &Rc<str>, line: usize) -> Result<Directive, AssemblyError> {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let value = build_expr_operand(inner.next().unwrap(), file, line)?;
    Ok(Directive::Equ { name, value })
}

fn build_include(pair: Pair<Rule>) -> Result<Directive, AssemblyError> {
    let string_pair = pair.into_inner().next().unwrap();
    Ok(Directive::Include(string_lit_value(string_pair)))
}

fn string_lit_value(pair: Pair<Rule>) -> String {
    pair.into_inner().next().unwrap().as_str().to_string()
}
