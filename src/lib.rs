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

pub mod assembler;
pub mod ast;
pub mod errors;
pub mod file_reader;
pub mod parser;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use assembler::section::SectionImage;
use errors::AssemblyError;
use file_reader::FileReader;

extern crate pest;
extern crate pest_derive;

/// Runs the full pipeline (§3) on `source_path`: recursive parsing, constant
/// resolution, symbol-table construction, bytecode generation, and fixup
/// resolution. Returns one [`SectionImage`] per populated section; ROM
/// padding/checksumming for a final cartridge image is the driver's job,
/// not this crate's (§1 Non-goals).
pub fn assemble<F: FileReader>(
    source_path: &Path,
    reader: &F,
) -> Result<Vec<SectionImage>, AssemblyError> {
    let mut include_stack: HashSet<PathBuf> = HashSet::new();
    let lines = parser::parse_source_recursive(source_path, &mut include_stack, reader)?;

    let constants = assembler::build_constants(&lines)?;
    let symbols = assembler::build_symbol_table(&lines, &constants)?;
    assembler::generate_bytecode(&lines, &constants, &symbols)
}
