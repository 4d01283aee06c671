//! Column sampling from CSV files.

use anyhow::{Context, Result};
use datatier_core::{extract_samples, ClassificationRequest, Provenance};
use std::path::Path;
use tracing::debug;

/// Read a CSV file and build one classification request per column, in
/// header order. Each column is sampled with its first non-empty values.
pub fn read_requests(path: &Path, source_type: &str) -> Result<Vec<ClassificationRequest>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers: Vec<String> = rdr
        .headers()
        .context("failed to read CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record.context("CSV parse error")?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }
    debug!("Read {} rows x {} columns from {}", rows.len(), headers.len(), path.display());

    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());

    headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let samples = extract_samples(rows.iter().map(|row| row.get(idx)));
            let request = ClassificationRequest::new(header, samples)
                .with_context(|| format!("column {} of {}", idx + 1, path.display()))?;
            let provenance = Provenance::new(
                source_name
                    .clone()
                    .unwrap_or_else(|| request.column_name().to_string()),
                source_type,
            );
            Ok(request.with_provenance(provenance))
        })
        .collect()
}
