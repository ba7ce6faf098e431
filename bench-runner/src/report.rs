//! CSV reporting

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::Context;

use crate::models::{CsvResultRow, ModulusResult};

/// Write one row per modulus, header first
pub fn write_csv<W: io::Write>(writer: W, results: &[ModulusResult]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for result in results {
        writer
            .serialize(CsvResultRow::from(result))
            .with_context(|| format!("failed to write row for modulus {}", result.modulus))?;
    }
    writer.flush().context("failed to flush CSV output")?;
    Ok(())
}

/// Export results to a CSV file
pub fn export_csv(path: &Path, results: &[ModulusResult]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    write_csv(file, results)
}
