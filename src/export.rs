//! Plain CSV import and export.
//!
//! Maps are written one neuron per row in arena order with the header
//! `x,y,v1,...,vN`. Codebooks are written one category per row with the
//! header `id,weight,created_at,last_update,v1,...,vN`. Input files are
//! numeric rows separated by commas; blank lines and `#` comments are ignored,
//! and a non-numeric first row is taken as a header and skipped.

use crate::art::MicroCategory;
use crate::dataset::VecDataset;
use crate::error::{Result, SomError};
use crate::som::SelfOrganizingMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

fn value_header(dimensionality: usize) -> String {
    (1..=dimensionality)
        .map(|i| format!("v{}", i))
        .collect::<Vec<_>>()
        .join(",")
}

fn join_values(values: &[f64]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

/// Writes the prototypes of `som` as CSV.
pub fn write_csv<W: Write>(som: &SelfOrganizingMap, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    writeln!(writer, "x,y,{}", value_header(som.dimensionality()))?;
    for neuron in som.neurons() {
        writeln!(writer, "{},{},{}", neuron.x(), neuron.y(), join_values(neuron.prototype()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the prototypes of `som` to a CSV file.
pub fn save_csv<P: AsRef<Path>>(som: &SelfOrganizingMap, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_csv(som, file)
}

/// Writes a StreamART2A codebook as CSV.
pub fn write_codebook_csv<W: Write>(codebook: &[MicroCategory], dimensionality: usize, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    writeln!(writer, "id,weight,created_at,last_update,{}", value_header(dimensionality))?;
    for category in codebook {
        writeln!(
            writer,
            "{},{},{},{},{}",
            category.id(),
            category.weight(),
            category.created_at(),
            category.last_update(),
            join_values(category.prototype())
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads numeric CSV rows into a dataset.
pub fn read_csv<R: BufRead>(reader: R) -> Result<VecDataset> {
    let mut inputs = Vec::new();
    let mut first_row = true;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let header_allowed = std::mem::replace(&mut first_row, false);

        let parsed: std::result::Result<Vec<f64>, _> =
            trimmed.split(',').map(|field| field.trim().parse::<f64>()).collect();
        match parsed {
            Ok(row) => inputs.push(row),
            Err(_) if header_allowed => continue,
            Err(e) => {
                return Err(SomError::Parse(format!("line {}: {}", line_no + 1, e)));
            }
        }
    }

    VecDataset::from_inputs(inputs)
}

/// Reads a numeric CSV file into a dataset.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<VecDataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SomError::FileNotFound(path.to_path_buf()));
    }
    read_csv(BufReader::new(File::open(path)?))
}
