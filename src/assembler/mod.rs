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

//! The three-stage assembler pipeline (§3, §9):
//!
//! 1. [`build_constants`] resolves every `EQU`/`DEF` against only the
//!    constants defined earlier in the source, fatally rejecting forward
//!    references (§4.5).
//! 2. [`build_symbol_table`] walks the program once more, structurally
//!    sizing every instruction and directive (by shape, never by a symbol's
//!    value — §9) to assign every label a concrete address.
//! 3. [`generate_bytecode`] walks a third time with the complete symbol
//!    table, emitting real bytes and deferring every value-bearing operand
//!    to a [`Fixup`](section::Fixup), which [`fixup::resolve`] then
//!    resolves and range-checks in one batched pass (§4.8).

pub mod encoder;
pub mod expression;
pub mod fixup;
pub mod numeric;
pub mod section;
pub mod symbol_table;

use crate::ast::{AssemblyLine, DbItem, Directive, Expr, Operand};
use crate::errors::AssemblyError;
use expression::{eval, EvalError};
use section::{FixupKind, SectionImage, SectionRegistry};
use std::collections::HashMap;
use symbol_table::{SymbolKind, SymbolTable};

/// Pass 0 (§4.5): resolves every `EQU`/`DEF` in source order against the
/// constants seen so far. A forward reference or reference to a label is
/// fatal here, not deferred, since constants must be fully known before
/// structural sizing begins.
pub fn build_constants(lines: &[AssemblyLine]) -> Result<HashMap<String, i64>, AssemblyError> {
    let mut constants = HashMap::new();

    for line in lines {
        if let Some(Directive::Equ { name, value }) = &line.directive {
            if constants.contains_key(name) {
                return Err(AssemblyError::Semantic {
                    file: line.file.to_string(),
                    line: line.line_number,
                    reason: format!("redefinition of constant \"{name}\""),
                });
            }
            let resolved = eval_immediate(value, &constants, &line.file, line.line_number)?;
            constants.insert(name.clone(), resolved);
        }
    }

    Ok(constants)
}

fn eval_immediate(
    expr: &Expr,
    constants: &HashMap<String, i64>,
    file: &std::rc::Rc<str>,
    line: usize,
) -> Result<i64, AssemblyError> {
    let lookup = |name: &str| constants.get(name).copied();
    eval(expr, &lookup).map_err(|e| to_assembly_error(e, file, line))
}

fn to_assembly_error(e: EvalError, file: &std::rc::Rc<str>, line: usize) -> AssemblyError {
    match e {
        EvalError::Unresolved(name) => AssemblyError::Semantic {
            file: file.to_string(),
            line,
            reason: format!("\"{name}\" is not a previously defined constant"),
        },
        EvalError::DivByZero => AssemblyError::Semantic {
            file: file.to_string(),
            line,
            reason: "division by zero".to_string(),
        },
    }
}

/// Substitutes every constant reference `fold` can fully resolve. Used only
/// where a value must be known at structural-sizing time (bit/rst indices,
/// `DS` counts, `SECTION ... BANK[...]`): everywhere else a reference to a
/// forward label is legal and handled by the fixup queue instead.
fn fold_constants(expr: &Expr, constants: &HashMap<String, i64>) -> Expr {
    let lookup = |name: &str| constants.get(name).copied();
    match eval(expr, &lookup) {
        Ok(v) => Expr::Int(v),
        Err(_) => expr.clone(),
    }
}

/// Pass 1 (§9 Design Notes): structural sizing. Every instruction's length
/// comes from its mnemonic and operand shapes alone; no symbol's value is
/// consulted, which is what lets this pass assign label addresses without a
/// chicken-and-egg dependency on those same addresses.
pub fn build_symbol_table(
    lines: &[AssemblyLine],
    constants: &HashMap<String, i64>,
) -> Result<SymbolTable, AssemblyError> {
    let mut symbols = SymbolTable::new();
    let mut registry = SectionRegistry::new();
    let mut current_global: Option<String> = None;

    for (name, value) in constants {
        symbols
            .define(name, SymbolKind::Constant, *value, None, &blank_file(), 0)
            .map_err(|_| AssemblyError::SemanticNoLine {
                reason: format!("constant \"{name}\" collides with an existing symbol"),
            })?;
    }

    for line in lines {
        if let Some(label) = &line.label {
            define_label(&mut symbols, &mut registry, &mut current_global, label, line)?;
        }

        if let Some(directive) = &line.directive {
            layout_directive(directive, &mut registry, constants, line)?;
        }

        if let Some(instruction) = &line.instruction {
            let folded = fold_bit_rst_operands(instruction, constants);
            let encoded = encoder::encode(&folded, &line.file, line.line_number)?;
            registry.reserve(encoded.len(), 0, &line.file, line.line_number)?;
        }
    }

    Ok(symbols)
}

/// Pass 2 (§4.8): emits real bytes and queues a [`section::Fixup`] for
/// every operand whose value isn't already nailed down by shape alone.
pub fn generate_bytecode(
    lines: &[AssemblyLine],
    constants: &HashMap<String, i64>,
    symbols: &SymbolTable,
) -> Result<Vec<SectionImage>, AssemblyError> {
    let mut registry = SectionRegistry::new();
    let mut current_global: Option<String> = None;

    for line in lines {
        if let Some(label) = &line.label {
            if !label.name.starts_with('.') {
                current_global = Some(label.name.clone());
            }
        }

        if let Some(directive) = &line.directive {
            emit_directive(directive, &mut registry, constants, &current_global, line)?;
        }

        if let Some(instruction) = &line.instruction {
            let folded = fold_bit_rst_operands(instruction, constants);
            let encoded = encoder::encode(&folded, &line.file, line.line_number)?;
            registry.emit(&encoded.bytes, &line.file, line.line_number)?;
            if let Some((expr, width, kind)) = encoded.operand {
                let offset = registry.emit(&vec![0u8; width as usize], &line.file, line.line_number)?;
                let dispatch_ip = registry.current().expect("active section").ip;
                registry.queue_fixup(
                    offset,
                    width,
                    kind,
                    expr,
                    line.file.clone(),
                    line.line_number,
                    current_global.clone(),
                    dispatch_ip,
                );
            }
        }
    }

    let fixups = std::mem::take(&mut registry.fixups);
    fixup::resolve(registry.sections_mut(), &fixups, symbols)?;

    Ok(registry.into_images())
}

fn define_label(
    symbols: &mut SymbolTable,
    registry: &mut SectionRegistry,
    current_global: &mut Option<String>,
    label: &crate::ast::LabelDef,
    line: &AssemblyLine,
) -> Result<(), AssemblyError> {
    let ip = registry
        .current()
        .ok_or_else(|| AssemblyError::Structural {
            file: line.file.to_string(),
            line: line.line_number,
            reason: format!("label \"{}\" defined before any SECTION", label.name),
        })?
        .ip;

    let kind = if label.exported {
        SymbolKind::ExportedLabel
    } else {
        SymbolKind::Label
    };

    symbols.define(
        &label.name,
        kind,
        ip as i64,
        current_global.as_deref(),
        &line.file,
        line.line_number,
    )?;

    if !label.name.starts_with('.') {
        *current_global = Some(label.name.clone());
    }

    Ok(())
}

fn layout_directive(
    directive: &Directive,
    registry: &mut SectionRegistry,
    constants: &HashMap<String, i64>,
    line: &AssemblyLine,
) -> Result<(), AssemblyError> {
    match directive {
        Directive::Section { name, region, bank } => {
            let bank_value = resolve_constant_expr(bank.as_ref(), constants, line)?;
            registry.switch(name, *region, bank_value.unwrap_or(0) as u32);
        }
        Directive::Db(items) => {
            let len: u32 = items
                .iter()
                .map(|item| match item {
                    DbItem::Str(s) => s.len() as u32,
                    DbItem::Value(_) => 1,
                })
                .sum();
            registry.reserve(len, 0, &line.file, line.line_number)?;
        }
        Directive::Dw(items) => {
            registry.reserve(items.len() as u32 * 2, 0, &line.file, line.line_number)?;
        }
        Directive::Ds { count, fill: _ } => {
            let n = require_constant_expr(count, constants, line)?;
            registry.reserve(n as u32, 0, &line.file, line.line_number)?;
        }
        Directive::Equ { .. } | Directive::Include(_) => {}
    }
    Ok(())
}

fn emit_directive(
    directive: &Directive,
    registry: &mut SectionRegistry,
    constants: &HashMap<String, i64>,
    current_global: &Option<String>,
    line: &AssemblyLine,
) -> Result<(), AssemblyError> {
    match directive {
        Directive::Section { name, region, bank } => {
            let bank_value = resolve_constant_expr(bank.as_ref(), constants, line)?;
            registry.switch(name, *region, bank_value.unwrap_or(0) as u32);
        }
        Directive::Db(items) => {
            for item in items {
                match item {
                    DbItem::Str(s) => {
                        registry.emit(s.as_bytes(), &line.file, line.line_number)?;
                    }
                    DbItem::Value(expr) => {
                        let offset = registry.emit(&[0u8], &line.file, line.line_number)?;
                        let dispatch_ip = registry.current().expect("active section").ip;
                        registry.queue_fixup(
                            offset,
                            1,
                            FixupKind::Absolute,
                            expr.clone(),
                            line.file.clone(),
                            line.line_number,
                            current_global.clone(),
                            dispatch_ip,
                        );
                    }
                }
            }
        }
        Directive::Dw(items) => {
            for expr in items {
                let offset = registry.emit(&[0u8, 0u8], &line.file, line.line_number)?;
                let dispatch_ip = registry.current().expect("active section").ip;
                registry.queue_fixup(
                    offset,
                    2,
                    FixupKind::Absolute,
                    expr.clone(),
                    line.file.clone(),
                    line.line_number,
                    current_global.clone(),
                    dispatch_ip,
                );
            }
        }
        Directive::Ds { count, fill } => {
            let n = require_constant_expr(count, constants, line)?;
            let fill_byte = match fill {
                Some(expr) => require_constant_expr(expr, constants, line)? as u8,
                None => 0,
            };
            registry.reserve(n as u32, fill_byte, &line.file, line.line_number)?;
        }
        Directive::Equ { .. } | Directive::Include(_) => {}
    }
    Ok(())
}

fn resolve_constant_expr(
    expr: Option<&Expr>,
    constants: &HashMap<String, i64>,
    line: &AssemblyLine,
) -> Result<Option<i64>, AssemblyError> {
    match expr {
        Some(e) => Ok(Some(require_constant_expr(e, constants, line)?)),
        None => Ok(None),
    }
}

fn require_constant_expr(
    expr: &Expr,
    constants: &HashMap<String, i64>,
    line: &AssemblyLine,
) -> Result<i64, AssemblyError> {
    eval_immediate(expr, constants, &line.file, line.line_number)
}

/// `BIT`/`RES`/`SET`'s bit index and `RST`'s target select fixed opcode
/// bits, so they must resolve before the instruction can even be sized
/// (§9); every other instruction operand may legally stay a deferred
/// expression.
fn fold_bit_rst_operands(
    instruction: &crate::ast::RawInstruction,
    constants: &HashMap<String, i64>,
) -> crate::ast::RawInstruction {
    let needs_fold = matches!(instruction.mnemonic.as_str(), "bit" | "res" | "set" | "rst");
    if !needs_fold {
        return instruction.clone();
    }
    let operands = instruction
        .operands
        .iter()
        .map(|op| match op {
            Operand::Expr(e) => Operand::Expr(fold_constants(e, constants)),
            other => other.clone(),
        })
        .collect();
    crate::ast::RawInstruction {
        mnemonic: instruction.mnemonic.clone(),
        operands,
    }
}

fn blank_file() -> std::rc::Rc<str> {
    std::rc::Rc::from("<constants>")
}
