//! Hospital file loader.
//!
//! The NHS hospital export is not a well-formed CSV: it is read with a
//! legacy single-byte encoding and its fields are separated by a
//! multi-character string, so the `csv` crate's single-byte delimiter does
//! not apply. The first non-empty line is the header row.

use std::path::Path;

use traffic_map_projection::coerce;

use crate::config::HospitalFormat;
use crate::{ParsedHospital, SourceError};

const DATASET: &str = "hospital";

pub const NAME_COLUMN: &str = "OrganisationName";
pub const LONGITUDE_COLUMN: &str = "Longitude";
pub const LATITUDE_COLUMN: &str = "Latitude";

/// Loads hospitals from the file at `path`.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read, the encoding label is
/// unknown, the header row is missing, or a required column is absent.
pub fn load_hospitals(
    path: &Path,
    format: &HospitalFormat,
) -> Result<Vec<ParsedHospital>, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| SourceError::io(path, e))?;
    let hospitals = parse_hospitals(&bytes, format)?;
    log::info!(
        "Loaded {} hospitals from {}",
        hospitals.len(),
        path.display()
    );
    Ok(hospitals)
}

/// Decodes and parses raw hospital file bytes.
///
/// # Errors
///
/// See [`load_hospitals`].
pub fn parse_hospitals(
    bytes: &[u8],
    format: &HospitalFormat,
) -> Result<Vec<ParsedHospital>, SourceError> {
    let encoding = encoding_rs::Encoding::for_label(format.encoding.as_bytes())
        .ok_or_else(|| SourceError::Encoding(format.encoding.clone()))?;

    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        log::warn!(
            "Hospital file contains bytes that are invalid in {}",
            encoding.name()
        );
    }

    let delimiter = format.delimiter.as_str();
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header: Vec<&str> = lines
        .next()
        .ok_or(SourceError::Empty { dataset: DATASET })?
        .split(delimiter)
        .map(str::trim)
        .collect();

    let find = |name: &str| {
        header
            .iter()
            .position(|h| *h == name)
            .ok_or_else(|| SourceError::MissingColumn {
                dataset: DATASET,
                column: name.to_string(),
            })
    };
    let name_idx = find(NAME_COLUMN)?;
    let lon_idx = find(LONGITUDE_COLUMN)?;
    let lat_idx = find(LATITUDE_COLUMN)?;

    let mut hospitals = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line) in lines.enumerate() {
        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
        let field = |idx: usize| fields.get(idx).copied().unwrap_or("");
        let name = field(name_idx);

        let position = coerce(field(lon_idx))
            .and_then(|lon| coerce(field(lat_idx)).map(|lat| (lon, lat)));
        match position {
            Ok((longitude, latitude)) => hospitals.push(ParsedHospital {
                name: name.to_string(),
                longitude,
                latitude,
            }),
            Err(e) => {
                log::warn!("Skipping hospital row {} ({name}): {e}", line_no + 2);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} hospital rows that could not be coerced");
    }

    Ok(hospitals)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// UTF-8 encoded `¬`, which reads as `Â¬` under windows-1252.
    const SEP: &[u8] = b"\xC2\xAC";

    fn join(fields: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, f) in fields.iter().enumerate() {
            if i > 0 {
                out.extend_from_slice(SEP);
            }
            out.extend_from_slice(f);
        }
        out.extend_from_slice(b"\r\n");
        out
    }

    fn sample() -> Vec<u8> {
        let mut bytes = join(&[b"OrganisationCode", b"OrganisationName", b"Latitude", b"Longitude"]);
        bytes.extend(join(&[b"RAJ01", b"Southend Hospital", b"51.55", b"0.68"]));
        bytes.extend(join(&[b"RBT20", b"St Mary\x92s Hospital", b"51.52", b"-0.17"]));
        bytes.extend(join(&[b"XXX00", b"Nowhere Clinic", b"", b"-1.0"]));
        bytes
    }

    #[test]
    fn parses_legacy_encoded_file() {
        let hospitals = parse_hospitals(&sample(), &HospitalFormat::default()).unwrap();
        assert_eq!(hospitals.len(), 2);

        assert_eq!(hospitals[0].name, "Southend Hospital");
        assert!((hospitals[0].latitude - 51.55).abs() < 1e-9);
        assert!((hospitals[0].longitude - 0.68).abs() < 1e-9);

        // 0x92 is a right single quote in windows-1252
        assert_eq!(hospitals[1].name, "St Mary\u{2019}s Hospital");
    }

    #[test]
    fn custom_delimiter() {
        let text = "OrganisationName|Longitude|Latitude\nA|-1.5|53.0\n";
        let format = HospitalFormat {
            encoding: "utf-8".to_string(),
            delimiter: "|".to_string(),
        };
        let hospitals = parse_hospitals(text.as_bytes(), &format).unwrap();
        assert_eq!(hospitals.len(), 1);
        assert_eq!(hospitals[0].name, "A");
    }

    #[test]
    fn missing_column_is_error() {
        let bytes = join(&[b"OrganisationName", b"Latitude"]);
        let err = parse_hospitals(&bytes, &HospitalFormat::default()).unwrap_err();
        assert!(matches!(
            err,
            SourceError::MissingColumn { column, .. } if column == LONGITUDE_COLUMN
        ));
    }

    #[test]
    fn empty_file_is_error() {
        let err = parse_hospitals(b"\n\n", &HospitalFormat::default()).unwrap_err();
        assert!(matches!(err, SourceError::Empty { .. }));
    }

    #[test]
    fn unknown_encoding_is_error() {
        let format = HospitalFormat {
            encoding: "klingon".to_string(),
            ..HospitalFormat::default()
        };
        let err = parse_hospitals(&sample(), &format).unwrap_err();
        assert!(matches!(err, SourceError::Encoding(_)));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UK_Hospital.csv");
        std::fs::write(&path, sample()).unwrap();

        let hospitals = load_hospitals(&path, &HospitalFormat::default()).unwrap();
        assert_eq!(hospitals.len(), 2);
    }
}
