//! Cross-location CSV loader.

use std::io::Read;
use std::path::Path;

use traffic_map_crosses_models::CrossRecord;

use crate::SourceError;

/// Loads crosses from a CSV file on disk.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or its header
/// cannot be read.
pub fn load_crosses(path: &Path) -> Result<Vec<CrossRecord>, SourceError> {
    let file = std::fs::File::open(path).map_err(|e| SourceError::io(path, e))?;
    let crosses = read_crosses(file)?;
    log::info!("Loaded {} crosses from {}", crosses.len(), path.display());
    Ok(crosses)
}

/// Reads crosses from any CSV byte stream. Extra columns are ignored; rows
/// that do not deserialize are skipped.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header row cannot be read.
pub fn read_crosses<R: Read>(reader: R) -> Result<Vec<CrossRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in ["cross_id", "x", "y", "pass_end_x", "pass_end_y"] {
        if !headers.iter().any(|h| h == column) {
            return Err(SourceError::MissingColumn {
                dataset: "cross",
                column: column.to_string(),
            });
        }
    }

    let mut crosses = Vec::new();
    for (line, result) in reader.deserialize::<CrossRecord>().enumerate() {
        match result {
            Ok(cross) if cross.x.is_finite() && cross.y.is_finite() => crosses.push(cross),
            Ok(cross) => log::warn!("Skipping cross {} with non-finite start", cross.cross_id),
            Err(e) => log::warn!("Skipping cross row {}: {e}", line + 2),
        }
    }

    Ok(crosses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_crosses_ignoring_extra_columns() {
        let csv = "index,cross_id,x,y,pass_end_x,pass_end_y\n\
                   0,101,80.5,9.2,95.0,40.0\n\
                   1,102,78.0,10.0,97.5,55.1\n";
        let crosses = read_crosses(csv.as_bytes()).unwrap();
        assert_eq!(crosses.len(), 2);
        assert_eq!(crosses[0].cross_id, "101");
        assert!((crosses[1].pass_end_y - 55.1).abs() < 1e-9);
    }

    #[test]
    fn skips_malformed_rows() {
        let csv = "cross_id,x,y,pass_end_x,pass_end_y\n\
                   1,80,9,95,40\n\
                   2,eighty,9,95,40\n";
        let crosses = read_crosses(csv.as_bytes()).unwrap();
        assert_eq!(crosses.len(), 1);
    }

    #[test]
    fn missing_column_is_error() {
        let err = read_crosses("cross_id,x,y\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn { .. }));
    }
}
