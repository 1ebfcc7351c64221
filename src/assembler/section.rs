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

//! The section/IP model (§4.7) and the fixup queue it owns (§3, §4.8).
//! The registry is the single owner of sections; symbols hold resolved
//! logical addresses rather than direct references into this table, which
//! breaks the symbol/section/IP reference cycle the source diary warned
//! about (§9).

use crate::ast::{Expr, Region};
use crate::errors::AssemblyError;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FixupKind {
    Absolute,
    Relative8,
    /// A plain signed 8-bit immediate that is not IP-relative, e.g. the `e`
    /// in `LD HL,SP+e` or `ADD SP,e`.
    Signed8,
}

#[derive(Debug, Clone)]
pub struct Fixup {
    pub section: usize,
    pub offset: u32,
    pub width: u8,
    pub kind: FixupKind,
    pub expr: Expr,
    pub file: Rc<str>,
    pub line: usize,
    pub current_global: Option<String>,
    /// IP immediately past the fixed-up field, needed for relative8's
    /// `target - (offset + 1)` calculation once the buffer has moved.
    pub dispatch_ip: u32,
}

pub struct Section {
    pub name: String,
    pub region: Region,
    pub bank: u32,
    pub base: u32,
    pub ip: u32,
    pub bytes: Vec<u8>,
}

impl Section {
    fn new(name: String, region: Region, bank: u32) -> Self {
        let base = region.base();
        Section {
            name,
            region,
            bank,
            base,
            ip: base,
            bytes: Vec::new(),
        }
    }

    fn end(&self) -> u32 {
        self.base + self.region.size()
    }
}

/// Owns every section created during the run plus the pending fixup queue.
/// Exactly one section is "current" at a time; `emit`/`reserve` only ever
/// touch it, so out-of-order appends to other sections are impossible by
/// construction (§9, out-of-order section emission).
pub struct SectionRegistry {
    sections: Vec<Section>,
    index: HashMap<(String, Region), usize>,
    current: Option<usize>,
    pub fixups: Vec<Fixup>,
}

impl SectionRegistry {
    pub fn new() -> Self {
        SectionRegistry {
            sections: Vec::new(),
            index: HashMap::new(),
            current: None,
            fixups: Vec::new(),
        }
    }

    /// Creates or switches to a section. Duplicate (name, region) re-opens
    /// the existing section and resumes its IP.
    pub fn switch(&mut self, name: &str, region: Region, bank: u32) -> usize {
        let key = (name.to_string(), region);
        if let Some(&idx) = self.index.get(&key) {
            self.current = Some(idx);
            return idx;
        }
        let idx = self.sections.len();
        self.sections.push(Section::new(name.to_string(), region, bank));
        self.index.insert(key, idx);
        self.current = Some(idx);
        idx
    }

    pub fn current(&self) -> Option<&Section> {
        self.current.map(|i| &self.sections[i])
    }

    pub fn current_idx(&self) -> Option<usize> {
        self.current
    }

    fn current_mut(&mut self) -> &mut Section {
        self.sections
            .get_mut(self.current.expect("no active section"))
            .unwrap()
    }

    /// Appends bytes to the current section, advancing the IP. Fatal if the
    /// write would run past the region's address-space boundary.
    pub fn emit(&mut self, bytes: &[u8], file: &Rc<str>, line: usize) -> Result<u32, AssemblyError> {
        let sec = self.current_mut();
        let offset = sec.ip - sec.base;
        let new_ip = sec.ip as u64 + bytes.len() as u64;
        if new_ip > sec.end() as u64 {
            return Err(AssemblyError::Structural {
                file: file.to_string(),
                line,
                reason: format!(
                    "section \"{}\" overflowed its {:?} region (0x{:04X}-0x{:04X})",
                    sec.name,
                    sec.region,
                    sec.base,
                    sec.end() - 1
                ),
            });
        }
        sec.bytes.extend_from_slice(bytes);
        sec.ip = new_ip as u32;
        Ok(offset)
    }

    /// Advances the IP by `n` without writing. In ROM regions the bytes are
    /// materialized with `fill`; in RAM-family regions no bytes are emitted.
    pub fn reserve(
        &mut self,
        n: u32,
        fill: u8,
        file: &Rc<str>,
        line: usize,
    ) -> Result<(), AssemblyError> {
        let sec = self.current_mut();
        let is_rom = sec.region.is_rom();
        let new_ip = sec.ip as u64 + n as u64;
        if new_ip > sec.end() as u64 {
            return Err(AssemblyError::Structural {
                file: file.to_string(),
                line,
                reason: format!(
                    "section \"{}\" overflowed its {:?} region (0x{:04X}-0x{:04X})",
                    sec.name,
                    sec.region,
                    sec.base,
                    sec.end() - 1
                ),
            });
        }
        if is_rom {
            sec.bytes.resize(sec.bytes.len() + n as usize, fill);
        }
        sec.ip = new_ip as u32;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn queue_fixup(
        &mut self,
        offset: u32,
        width: u8,
        kind: FixupKind,
        expr: Expr,
        file: Rc<str>,
        line: usize,
        current_global: Option<String>,
        dispatch_ip: u32,
    ) {
        let section = self.current.expect("no active section");
        self.fixups.push(Fixup {
            section,
            offset,
            width,
            kind,
            expr,
            file,
            line,
            current_global,
            dispatch_ip,
        });
    }

    pub fn into_images(self) -> Vec<SectionImage> {
        self.sections
            .into_iter()
            .filter(|s| !s.bytes.is_empty())
            .map(|s| SectionImage {
                name: s.name,
                region: s.region,
                base: s.base,
                bank: s.bank,
                bytes: s.bytes,
            })
            .collect()
    }

    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }
}

/// The resolved byte image for one populated section, handed to the
/// driver's `write_section` sink (§6).
#[derive(Debug)]
pub struct SectionImage {
    pub name: String,
    pub region: Region,
    pub base: u32,
    pub bank: u32,
    pub bytes: Vec<u8>,
}
