use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{debug, info};

use super::model::{Dataset, Record, Store};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one store export from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – comma separated, first row is the header
/// * `.tsv` – tab separated, first row is the header
pub fn load_file(path: &Path, store: Store) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let delimiter = match ext.as_str() {
        "csv" => b',',
        "tsv" => b'\t',
        other => bail!("Unsupported file extension: .{other}"),
    };

    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {} export {}", store, path.display()))?;
    let dataset = load_reader(file, delimiter, store)
        .with_context(|| format!("reading {}", path.display()))?;

    info!(
        "loaded {} rows x {} columns of {} data from {}",
        dataset.len(),
        dataset.header.len(),
        store,
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Delimited reader
// ---------------------------------------------------------------------------

/// Parse a delimited table.  Row length is not enforced here: the Google
/// Play export carries one short row that cleaning removes by position, and
/// [`Dataset::check_arity`] rejects anything left over afterwards.
pub fn load_reader<R: Read>(reader: R, delimiter: u8, store: Store) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let header: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    debug!("{store} header: {header:?}");

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("data row {row_no}"))?;
        records.push(row.iter().collect::<Record>());
    }

    Ok(Dataset::new(store, header, records)?)
}
