//! CSV table I/O
//!
//! Reading is lenient about row length: short rows leave the trailing columns
//! empty and surplus cells are dropped. Writing always renders the full table
//! in memory before anything touches the destination.

use crate::fs_utils::write_atomic;
use crate::record::IdeaRecord;
use crate::Result;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// Read a CSV file with a header row into records
pub fn read_records(path: &Path) -> Result<Vec<IdeaRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let pairs = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), row.get(i).unwrap_or("").to_string()));
        records.push(IdeaRecord::from_pairs(pairs));
    }

    tracing::debug!(
        path = %path.display(),
        rows = records.len(),
        columns = headers.len(),
        "Read CSV file"
    );

    Ok(records)
}

/// Render a header row plus data rows to CSV bytes
pub fn render_csv<I, R>(columns: &[&str], rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| crate::Error::Io(e.into_error()))
}

/// Write records to `path` with the given column order, atomically
pub fn write_records(path: &Path, columns: &[&str], records: &[IdeaRecord]) -> Result<()> {
    let bytes = render_csv(
        columns,
        records.iter().map(|record| record.values_in_order(columns)),
    )?;
    write_atomic(path, &bytes)
}
