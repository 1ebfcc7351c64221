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

pub mod ast_builder;
pub mod tokenizer;

use crate::ast::{AssemblyLine, Directive};
use crate::errors::AssemblyError;
use crate::file_reader::FileReader;
use pest::Parser;
use pest_derive::Parser;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser)]
#[grammar = "./parser/grammar.pest"]
pub struct LineParser;

/// Parses a single file's text into a flat line sequence, not yet expanding
/// `INCLUDE`.
pub fn parse_source(source: &str, file: &Rc<str>) -> Result<Vec<AssemblyLine>, AssemblyError> {
    let mut pairs = LineParser::parse(Rule::program, source).map_err(|e| AssemblyError::Syntax {
        file: file.to_string(),
        line: 0,
        source: Box::new(e),
    })?;

    let program = pairs.next().expect("program rule always present");
    let mut lines = Vec::new();

    for pair in program.into_inner() {
        if pair.as_rule() != Rule::line_content {
            continue; // EOI
        }
        let line_number = pair.as_span().start_pos().line_col().0;
        let assembly_line = ast_builder::build_line(pair, file, line_number)?;
        if assembly_line.label.is_some()
            || assembly_line.directive.is_some()
            || assembly_line.instruction.is_some()
        {
            lines.push(assembly_line);
        }
    }

    Ok(lines)
}

/// Parses `path` and recursively splices in every `INCLUDE`d file's lines at
/// the position of the directive, preserving source order (§5). Recursive
/// includes are detected by canonical path identity.
pub fn parse_source_recursive<F: FileReader>(
    path: &Path,
    include_stack: &mut HashSet<PathBuf>,
    reader: &F,
) -> Result<Vec<AssemblyLine>, AssemblyError> {
    let canonical = path.to_path_buf();
    if !include_stack.insert(canonical.clone()) {
        return Err(AssemblyError::RecursiveInclude {
            file: path.display().to_string(),
            line: 0,
            path: path.display().to_string(),
        });
    }

    let source = reader.read_to_string(path).map_err(|e| AssemblyError::Io {
        path: path.display().to_string(),
        source: std::io::Error::other(e.to_string()),
    })?;
    let file: Rc<str> = Rc::from(path.display().to_string());
    let lines = parse_source(&source, &file)?;

    let mut expanded = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(Directive::Include(include_path)) = &line.directive {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            let resolved = base.join(include_path);
            let nested = parse_source_recursive(&resolved, include_stack, reader).map_err(|e| {
                if let AssemblyError::RecursiveInclude { path: p, .. } = e {
                    AssemblyError::RecursiveInclude {
                        file: line.file.to_string(),
                        line: line.line_number,
                        path: p,
                    }
                } else {
                    e
                }
            })?;
            expanded.extend(nested);
        } else {
            expanded.push(line);
        }
    }

    include_stack.remove(&canonical);
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Directive, Region};

    fn file() -> Rc<str> {
        Rc::from("t.asm")
    }

    #[test]
    fn parses_nop() {
        let lines = parse_source("nop\n", &file()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].instruction.as_ref().unwrap().mnemonic, "nop");
    }

    #[test]
    fn parses_label_and_section() {
        let lines = parse_source("SECTION \"x\", ROM0\n.start: jr .start\n", &file()).unwrap();
        assert_eq!(lines.len(), 2);
        match &lines[0].directive {
            Some(Directive::Section { name, region, .. }) => {
                assert_eq!(name, "x");
                assert_eq!(*region, Region::Rom0);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(lines[1].label.as_ref().unwrap().name, ".start");
    }

    #[test]
    fn parses_exported_label() {
        let lines = parse_source("main:: nop\n", &file()).unwrap();
        assert!(lines[0].label.as_ref().unwrap().exported);
    }

    #[test]
    fn parses_comment_only_line() {
        let lines = parse_source("; just a comment\nnop\n", &file()).unwrap();
        assert_eq!(lines.len(), 1);
    }
}
