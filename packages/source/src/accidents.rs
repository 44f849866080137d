//! Accident CSV loader.
//!
//! Reads the comma-separated accident export, locates the required columns
//! by header name, and coerces each row into a [`ParsedAccident`]. Rows with
//! a missing or non-numeric position, an unknown severity code, bad counts
//! or an unparseable date are skipped with a warning.

use std::io::Read;
use std::path::Path;

use traffic_map_accident_models::AccidentSeverity;
use traffic_map_projection::coerce;

use crate::parsing::{parse_count, parse_date_time};
use crate::{ParsedAccident, SourceError};

const DATASET: &str = "accident";

pub const ID_COLUMN: &str = "Accident_Index";
pub const LATITUDE_COLUMN: &str = "Latitude";
pub const LONGITUDE_COLUMN: &str = "Longitude";
pub const SEVERITY_COLUMN: &str = "Accident_Severity";
pub const VEHICLES_COLUMN: &str = "Number_of_Vehicles";
pub const CASUALTIES_COLUMN: &str = "Number_of_Casualties";
pub const WEATHER_COLUMN: &str = "Weather_Conditions";
pub const DATE_COLUMN: &str = "Date";
pub const TIME_COLUMN: &str = "Time";

/// Column positions resolved from the header row.
struct Columns {
    id: usize,
    latitude: usize,
    longitude: usize,
    severity: usize,
    vehicles: usize,
    casualties: usize,
    weather: Option<usize>,
    date: usize,
    time: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, SourceError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| SourceError::MissingColumn {
                dataset: DATASET,
                column: name.to_string(),
            })
        };

        Ok(Self {
            id: require(ID_COLUMN)?,
            latitude: require(LATITUDE_COLUMN)?,
            longitude: require(LONGITUDE_COLUMN)?,
            severity: require(SEVERITY_COLUMN)?,
            vehicles: require(VEHICLES_COLUMN)?,
            casualties: require(CASUALTIES_COLUMN)?,
            weather: find(WEATHER_COLUMN),
            date: require(DATE_COLUMN)?,
            time: find(TIME_COLUMN),
        })
    }
}

/// Loads accidents from a CSV file on disk.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened, has no header, or
/// lacks a required column.
pub fn load_accidents(path: &Path) -> Result<Vec<ParsedAccident>, SourceError> {
    let file = std::fs::File::open(path).map_err(|e| SourceError::io(path, e))?;
    let accidents = read_accidents(file)?;
    log::info!(
        "Loaded {} accidents from {}",
        accidents.len(),
        path.display()
    );
    Ok(accidents)
}

/// Reads accidents from any CSV byte stream.
///
/// # Errors
///
/// Returns [`SourceError`] if the stream has no header or lacks a required
/// column.
pub fn read_accidents<R: Read>(reader: R) -> Result<Vec<ParsedAccident>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(SourceError::Empty { dataset: DATASET });
    }
    let columns = Columns::resolve(&headers)?;

    let mut accidents = Vec::new();
    let mut skipped = 0usize;

    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping unreadable accident row {}: {e}", line + 2);
                skipped += 1;
                continue;
            }
        };

        match parse_row(&record, &columns) {
            Ok(accident) => accidents.push(accident),
            Err(reason) => {
                log::warn!("Skipping accident row {}: {reason}", line + 2);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} accident rows that could not be coerced");
    }

    Ok(accidents)
}

fn parse_row(record: &csv::StringRecord, columns: &Columns) -> Result<ParsedAccident, String> {
    let field = |idx: usize| record.get(idx).unwrap_or("").trim();
    let id = field(columns.id).to_string();

    let longitude = coerce(field(columns.longitude)).map_err(|e| format!("{id}: {e}"))?;
    let latitude = coerce(field(columns.latitude)).map_err(|e| format!("{id}: {e}"))?;

    let severity = parse_count(field(columns.severity))
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| format!("{id}: bad severity {:?}", field(columns.severity)))
        .and_then(|v| AccidentSeverity::from_value(v).map_err(|e| format!("{id}: {e}")))?;

    let vehicles = parse_count(field(columns.vehicles))
        .ok_or_else(|| format!("{id}: bad vehicle count {:?}", field(columns.vehicles)))?;
    let casualties = parse_count(field(columns.casualties))
        .ok_or_else(|| format!("{id}: bad casualty count {:?}", field(columns.casualties)))?;

    let occurred_at = parse_date_time(field(columns.date), columns.time.map(field))
        .ok_or_else(|| format!("{id}: bad date {:?}", field(columns.date)))?;

    let weather = columns
        .weather
        .map(field)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(ParsedAccident {
        id,
        longitude,
        latitude,
        severity,
        vehicles,
        casualties,
        weather,
        occurred_at,
    })
}
