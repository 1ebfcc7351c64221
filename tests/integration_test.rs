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

use lr35902asm::assemble;
use lr35902asm::errors::AssemblyError;
use lr35902asm::file_reader::MockFileReader;
use std::path::Path;

fn assemble_source(source: &str) -> Result<Vec<lr35902asm::assembler::section::SectionImage>, AssemblyError> {
    let mut reader = MockFileReader::default();
    reader.add_file("test.asm", source);
    assemble(Path::new("test.asm"), &reader)
}

#[test]
fn ld_hl_immediate16() {
    let images = assemble_source("SECTION \"main\", ROM0\nld HL, $FFDC\n").unwrap();
    assert_eq!(images[0].bytes, vec![0x21, 0xDC, 0xFF]);
}

#[test]
fn self_loop_relative_jump() {
    let images = assemble_source("SECTION \"main\", ROM0\nstart:\n.loop: jr .loop\n").unwrap();
    assert_eq!(images[0].bytes, vec![0x18, 0xFE]);
}

#[test]
fn forward_reference_absolute_jump() {
    let source = "SECTION \"main\", ROM0\njp later\nnop\nnop\nlater: nop\n";
    let images = assemble_source(source).unwrap();
    assert_eq!(images[0].bytes, vec![0xC3, 0x05, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn relative_jump_max_forward_offset_is_accepted() {
    let mut source = String::from("SECTION \"main\", ROM0\njr target\n");
    for _ in 0..127 {
        source.push_str("nop\n");
    }
    source.push_str("target: nop\n");
    let images = assemble_source(&source).unwrap();
    assert_eq!(images[0].bytes[0], 0x18);
    assert_eq!(images[0].bytes[1], 0x7F);
}

#[test]
fn relative_jump_one_past_max_is_rejected() {
    let mut source = String::from("SECTION \"main\", ROM0\njr target\n");
    for _ in 0..128 {
        source.push_str("nop\n");
    }
    source.push_str("target: nop\n");
    let err = assemble_source(&source).unwrap_err();
    assert!(matches!(err, AssemblyError::UndefinedReferences(_)));
}

#[test]
fn db_value_out_of_range_is_reported() {
    let err = assemble_source("SECTION \"main\", ROM0\nDB $100\n").unwrap_err();
    assert!(matches!(err, AssemblyError::UndefinedReferences(_)));
}

#[test]
fn redeclared_global_symbol_is_fatal() {
    let err = assemble_source("SECTION \"main\", ROM0\nfoo: nop\nfoo: nop\n").unwrap_err();
    assert!(matches!(err, AssemblyError::Semantic { .. }));
}

#[test]
fn recursive_include_is_fatal() {
    let mut reader = MockFileReader::default();
    reader.add_file("a.asm", "INCLUDE \"b.asm\"\n");
    reader.add_file("b.asm", "INCLUDE \"a.asm\"\n");
    let err = lr35902asm::assemble(Path::new("a.asm"), &reader).unwrap_err();
    assert!(matches!(err, AssemblyError::RecursiveInclude { .. }));
}

#[test]
fn local_label_scoped_to_enclosing_global() {
    let source = concat!(
        "SECTION \"main\", ROM0\n",
        "first:\n",
        ".loop: jr .loop\n",
        "second:\n",
        ".loop: jr .loop\n",
    );
    let images = assemble_source(source).unwrap();
    assert_eq!(images[0].bytes, vec![0x18, 0xFE, 0x18, 0xFE]);
}

#[test]
fn equ_constant_feeds_instruction_operand() {
    let source = "VBLANK_VEC EQU $40\nSECTION \"main\", ROM0\nld A, VBLANK_VEC\n";
    let images = assemble_source(source).unwrap();
    assert_eq!(images[0].bytes, vec![0x3E, 0x40]);
}

#[test]
fn equ_forward_reference_is_fatal() {
    let source = "A_CONST EQU B_CONST\nB_CONST EQU 1\n";
    let err = assemble_source(source).unwrap_err();
    assert!(matches!(err, AssemblyError::Semantic { .. }));
}

#[test]
fn db_mixes_strings_and_bytes() {
    let images = assemble_source("SECTION \"main\", ROM0\nDB \"GO\", $00\n").unwrap();
    assert_eq!(images[0].bytes, vec![b'G', b'O', 0x00]);
}

#[test]
fn ds_reserves_and_fills_rom() {
    let images = assemble_source("SECTION \"main\", ROM0\nDS 4, $FF\nnop\n").unwrap();
    assert_eq!(images[0].bytes, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x00]);
}

#[test]
fn cb_prefixed_bit_test() {
    let images = assemble_source("SECTION \"main\", ROM0\nbit 7, H\n").unwrap();
    assert_eq!(images[0].bytes, vec![0xCB, 0x7C]);
}

#[test]
fn include_splices_at_directive_position() {
    let mut reader = MockFileReader::default();
    reader.add_file("main.asm", "SECTION \"main\", ROM0\nnop\nINCLUDE \"inc.asm\"\nhalt\n");
    reader.add_file("inc.asm", "nop\n");
    let images = lr35902asm::assemble(Path::new("main.asm"), &reader).unwrap();
    assert_eq!(images[0].bytes, vec![0x00, 0x00, 0x76]);
}

#[test]
fn exported_label_is_tracked_as_export() {
    let images = assemble_source("SECTION \"main\", ROM0\nEntry::\n nop\n").unwrap();
    assert_eq!(images[0].bytes, vec![0x00]);
}

#[test]
fn section_overflow_is_fatal() {
    let mut source = String::from("SECTION \"main\", HRAM\n");
    for _ in 0..200 {
        source.push_str("DS 1\n");
    }
    let err = assemble_source(&source).unwrap_err();
    assert!(matches!(err, AssemblyError::Structural { .. }));
}

#[test]
fn rst_restricted_to_legal_targets() {
    let images = assemble_source("SECTION \"main\", ROM0\nrst $38\n").unwrap();
    assert_eq!(images[0].bytes, vec![0xFF]);

    let err = assemble_source("SECTION \"main\", ROM0\nrst $05\n").unwrap_err();
    assert!(matches!(err, AssemblyError::Structural { .. }));
}
