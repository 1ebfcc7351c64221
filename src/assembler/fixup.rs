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

//! The fixup resolver (§4.8): the second pass that re-evaluates every
//! deferred operand now that the symbol table is complete, collecting every
//! error before aborting so the user sees all unresolved sites at once.

use crate::assembler::expression::{eval, EvalError};
use crate::assembler::section::{FixupKind, Section};
use crate::assembler::symbol_table::SymbolTable;
use crate::errors::AssemblyError;

pub fn resolve(
    sections: &mut [Section],
    fixups: &[crate::assembler::section::Fixup],
    symbols: &SymbolTable,
) -> Result<(), AssemblyError> {
    let mut errors = Vec::new();

    for fixup in fixups {
        let lookup = |name: &str| {
            symbols
                .lookup(name, fixup.current_global.as_deref())
                .map(|s| s.value)
        };

        let value = match eval(&fixup.expr, &lookup) {
            Ok(v) => v,
            Err(EvalError::Unresolved(name)) => {
                errors.push(AssemblyError::Semantic {
                    file: fixup.file.to_string(),
                    line: fixup.line,
                    reason: format!("undefined reference to \"{name}\""),
                });
                continue;
            }
            Err(EvalError::DivByZero) => {
                errors.push(AssemblyError::Semantic {
                    file: fixup.file.to_string(),
                    line: fixup.line,
                    reason: "division by zero".to_string(),
                });
                continue;
            }
        };

        match fixup.kind {
            FixupKind::Absolute => {
                if fixup.width == 1 {
                    if !(0..=0xFF).contains(&value) {
                        errors.push(AssemblyError::Semantic {
                            file: fixup.file.to_string(),
                            line: fixup.line,
                            reason: format!("value {value} does not fit in 8 bits"),
                        });
                        continue;
                    }
                    sections[fixup.section].bytes[fixup.offset as usize] = value as u8;
                } else {
                    if !(0..=0xFFFF).contains(&value) {
                        errors.push(AssemblyError::Semantic {
                            file: fixup.file.to_string(),
                            line: fixup.line,
                            reason: format!("value {value} does not fit in 16 bits"),
                        });
                        continue;
                    }
                    let bytes = (value as u16).to_le_bytes();
                    let at = fixup.offset as usize;
                    sections[fixup.section].bytes[at] = bytes[0];
                    sections[fixup.section].bytes[at + 1] = bytes[1];
                }
            }
            FixupKind::Signed8 => {
                if !(-128..=127).contains(&value) {
                    errors.push(AssemblyError::Semantic {
                        file: fixup.file.to_string(),
                        line: fixup.line,
                        reason: format!("value {value} does not fit in a signed 8-bit immediate"),
                    });
                    continue;
                }
                sections[fixup.section].bytes[fixup.offset as usize] = value as i8 as u8;
            }
            FixupKind::Relative8 => {
                let displacement = value - fixup.dispatch_ip as i64;
                if !(-128..=127).contains(&displacement) {
                    errors.push(AssemblyError::Semantic {
                        file: fixup.file.to_string(),
                        line: fixup.line,
                        reason: format!(
                            "relative jump displacement {displacement} out of range [-128, 127]"
                        ),
                    });
                    continue;
                }
                sections[fixup.section].bytes[fixup.offset as usize] = displacement as i8 as u8;
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AssemblyError::UndefinedReferences(errors))
    }
}
