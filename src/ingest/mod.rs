use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{fs::File, io::BufReader, path::Path};
use tracing::info;

/// Raw rows exactly as the export laid them out, before any cleaning.
///
/// The export's own header line is consumed by the reader, so `rows` starts
/// at the section-label row that precedes the duplicated header.
#[derive(Debug)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

/// Read a traffic-quality CSV export into a [`RawTable`].
///
/// The reader is flexible: ragged rows are kept as-is and sorted out during
/// cleaning rather than rejected here.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record =
            record.with_context(|| format!("Failed to read record from {}", path.display()))?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    info!(path = %path.display(), rows = rows.len(), "loaded raw CSV");
    Ok(RawTable::from_rows(rows))
}
