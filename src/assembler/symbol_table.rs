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

//! The symbol table (§4.3): name → (value, scope, kind), with the
//! `.local`-under-last-global qualification rule.

use crate::errors::AssemblyError;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Constant,
    Label,
    ExportedLabel,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub value: i64,
    pub scope: Scope,
    pub defined_file: Rc<str>,
    pub defined_line: usize,
}

const MAX_NAME_LEN: usize = 32;

#[derive(Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_name(name: &str, file: &str, line: usize) -> Result<(), AssemblyError> {
        let bare = name.strip_prefix('.').unwrap_or(name);
        let mut chars = bare.chars();
        let ok_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let ok_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !ok_start || !ok_rest || bare.is_empty() {
            return Err(AssemblyError::Lexical {
                file: file.to_string(),
                line,
                reason: format!("invalid symbol name: \"{name}\""),
            });
        }
        if name.len() > MAX_NAME_LEN {
            return Err(AssemblyError::Lexical {
                file: file.to_string(),
                line,
                reason: format!(
                    "symbol name \"{name}\" exceeds the maximum length of {MAX_NAME_LEN}"
                ),
            });
        }
        Ok(())
    }

    /// Qualifies a raw name (as written in source) against the last-seen
    /// global label. A `.name` with no preceding global is a fatal error.
    pub fn qualify(
        raw_name: &str,
        current_global: Option<&str>,
        file: &str,
        line: usize,
    ) -> Result<String, AssemblyError> {
        if let Some(local) = raw_name.strip_prefix('.') {
            let global = current_global.ok_or_else(|| AssemblyError::Semantic {
                file: file.to_string(),
                line,
                reason: format!("local symbol \".{local}\" has no preceding global label"),
            })?;
            Ok(format!("{global}.{local}"))
        } else {
            Ok(raw_name.to_string())
        }
    }

    pub fn define(
        &mut self,
        raw_name: &str,
        kind: SymbolKind,
        value: i64,
        current_global: Option<&str>,
        file: &Rc<str>,
        line: usize,
    ) -> Result<(), AssemblyError> {
        Self::validate_name(raw_name, file, line)?;
        let scope = if raw_name.starts_with('.') {
            Scope::Local
        } else {
            Scope::Global
        };
        let qualified = Self::qualify(raw_name, current_global, file, line)?;

        if let Some(existing) = self.symbols.get(&qualified) {
            return Err(AssemblyError::Semantic {
                file: file.to_string(),
                line,
                reason: format!(
                    "redefinition of \"{raw_name}\" (first defined at {}:{})",
                    existing.defined_file, existing.defined_line
                ),
            });
        }

        self.symbols.insert(
            qualified,
            Symbol {
                name: raw_name.to_string(),
                kind,
                value,
                scope,
                defined_file: file.clone(),
                defined_line: line,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, raw_name: &str, current_global: Option<&str>) -> Option<&Symbol> {
        if raw_name.starts_with('.') {
            let global = current_global?;
            let local = raw_name.strip_prefix('.').unwrap();
            self.symbols.get(&format!("{global}.{local}"))
        } else {
            self.symbols.get(raw_name)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> Rc<str> {
        Rc::from("test.asm")
    }

    #[test]
    fn defines_and_looks_up_global() {
        let mut table = SymbolTable::new();
        table
            .define("start", SymbolKind::Label, 0x150, None, &file(), 1)
            .unwrap();
        assert_eq!(table.lookup("start", None).unwrap().value, 0x150);
    }

    #[test]
    fn redefinition_is_fatal() {
        let mut table = SymbolTable::new();
        table
            .define("start", SymbolKind::Label, 0, None, &file(), 1)
            .unwrap();
        let err = table.define("start", SymbolKind::Label, 1, None, &file(), 2);
        assert!(err.is_err());
    }

    #[test]
    fn local_scoped_to_parent_global() {
        let mut table = SymbolTable::new();
        table
            .define("foo", SymbolKind::Label, 0x100, None, &file(), 1)
            .unwrap();
        table
            .define(".loop", SymbolKind::Label, 0x102, Some("foo"), &file(), 2)
            .unwrap();
        table
            .define("bar", SymbolKind::Label, 0x200, None, &file(), 3)
            .unwrap();
        // same local name reappears under a different global: allowed.
        table
            .define(".loop", SymbolKind::Label, 0x202, Some("bar"), &file(), 4)
            .unwrap();

        assert_eq!(table.lookup(".loop", Some("foo")).unwrap().value, 0x102);
        assert_eq!(table.lookup(".loop", Some("bar")).unwrap().value, 0x202);
    }

    #[test]
    fn local_with_no_preceding_global_is_fatal() {
        let mut table = SymbolTable::new();
        let err = table.define(".loop", SymbolKind::Label, 0, None, &file(), 1);
        assert!(err.is_err());
    }

    #[test]
    fn name_too_long_is_rejected() {
        let long_name = "a".repeat(33);
        assert!(SymbolTable::validate_name(&long_name, "t.asm", 1).is_err());
    }
}
