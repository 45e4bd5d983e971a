use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::constants::TABULAR_DELIMITER;

/// Writes a tabular payload as delimited text.
///
/// The first line is the header in the given column order; each row
/// follows in column order. A row shorter than the header is padded
/// with empty fields. Values are written verbatim: a value containing
/// the delimiter or a newline corrupts the row layout, and consumers
/// share that expectation.
///
/// Any mid-stream failure fails the whole artifact; the file handle is
/// closed on every exit path.
pub fn write_tabular(path: &Path, columns: &[String], rows: &[Vec<String>]) -> Result<()> {
    if columns.is_empty() {
        bail!("tabular payload has no columns");
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create tabular artifact {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let delimiter = TABULAR_DELIMITER.to_string();
    writeln!(writer, "{}", columns.join(&delimiter))
        .with_context(|| format!("Failed to write header to {}", path.display()))?;

    for row in rows {
        let line: Vec<&str> = (0..columns.len())
            .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        writeln!(writer, "{}", line.join(&delimiter))
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush tabular artifact {}", path.display()))?;

    Ok(())
}
