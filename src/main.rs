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

//! The thin CLI shell around the library (§6): load the source, run the
//! pipeline, and either report every diagnostic or write out one file per
//! populated section. Cartridge-header assembly (padding, checksums) is
//! explicitly out of scope for this crate and is not attempted here either.

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use lr35902asm::assemble;
use lr35902asm::file_reader::AsmFileReader;
use std::path::{Path, PathBuf};

#[derive(ClapParser)]
#[clap(version, author = "Connor Nolan")]
struct Opts {
    /// Source file to assemble.
    #[clap(short, long)]
    input: PathBuf,
    /// Base path for the emitted section images. Each populated section is
    /// written to "<output>.<section-name>.bin".
    #[clap(short, long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let reader = AsmFileReader;
    let input_path: &Path = &opts.input;

    let images = match assemble(input_path, &reader) {
        Ok(images) => images,
        Err(err) => {
            report(&err);
            std::process::exit(1);
        }
    };

    for image in &images {
        let dest = opts.output.with_extension(format!("{}.bin", image.name));
        std::fs::write(&dest, &image.bytes)
            .with_context(|| format!("failed to write section image to {}", dest.display()))?;
        println!(
            "{}: {:?} @ 0x{:04X} ({} bytes) -> {}",
            image.name,
            image.region,
            image.base,
            image.bytes.len(),
            dest.display()
        );
    }

    Ok(())
}

/// The driver's diagnostic sink (§6): one line per error, batched errors
/// expanded one-per-line.
fn report(err: &lr35902asm::errors::AssemblyError) {
    use lr35902asm::errors::AssemblyError;
    match err {
        AssemblyError::UndefinedReferences(errors) => {
            for e in errors {
                eprintln!("error: {e}");
            }
        }
        other => eprintln!("error: {other}"),
    }
}
