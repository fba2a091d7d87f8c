use std::io::Read;
use std::path::Path;

use thiserror::Error;

use super::dataset::{Dataset, Facility, ServiceFlag, ServiceFlags};

#[derive(Error, Debug)]
pub enum DataFormatError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Source is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

const COL_NAME: &str = "facility_name";
const COL_TYPE: &str = "facility_type_display";
const COL_STATE: &str = "State";
const COL_LGA: &str = "Local_Government_Area";
const COL_LAT: &str = "latitude";
const COL_LON: &str = "longitude";

/// Boolean service columns, in source order.
const SERVICE_COLUMNS: [&str; 11] = [
    "maternal_health_delivery_services",
    "emergency_transport",
    "skilled_birth_attendant",
    "phcn_electricity",
    "c_section_yn",
    "improved_water_supply",
    "improved_sanitation",
    "vaccines_fridge_freezer",
    "antenatal_care_yn",
    "family_planning_yn",
    "malaria_treatment_artemisinin",
];

/// Load the facility dataset from a CSV file on disk.
pub fn load_dataset_from_path(path: &Path) -> Result<Dataset, DataFormatError> {
    load_dataset(csv::Reader::from_path(path)?)
}

/// Load the facility dataset from any CSV reader.
///
/// Rows whose latitude or longitude is absent, non-numeric, or exactly
/// zero are dropped here and never reach the query engine. Service
/// columns are decoded to the tri-state `ServiceFlag`.
pub fn load_dataset<R: Read>(mut reader: csv::Reader<R>) -> Result<Dataset, DataFormatError> {
    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut facilities = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = record?;
        match facility_from_record(&record, &columns) {
            Some(facility) => facilities.push(facility),
            None => {
                dropped += 1;
                tracing::debug!(
                    row = facilities.len() + dropped,
                    "Dropping facility row with invalid coordinates"
                );
            }
        }
    }

    tracing::info!(
        loaded = facilities.len(),
        dropped,
        "Facility dataset loaded"
    );
    Ok(Dataset::new(facilities))
}

/// Header indices for every required column.
struct ColumnIndices {
    name: usize,
    facility_type: usize,
    state: usize,
    lga: usize,
    latitude: usize,
    longitude: usize,
    services: [usize; 11],
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<ColumnIndices, DataFormatError> {
    let index_of = |name: &str| headers.iter().position(|h| h == name);

    let mut missing = Vec::new();
    let mut require = |name: &str| -> usize {
        match index_of(name) {
            Some(i) => i,
            None => {
                missing.push(name.to_string());
                0
            }
        }
    };

    let columns = ColumnIndices {
        name: require(COL_NAME),
        facility_type: require(COL_TYPE),
        state: require(COL_STATE),
        lga: require(COL_LGA),
        latitude: require(COL_LAT),
        longitude: require(COL_LON),
        services: SERVICE_COLUMNS.map(|c| require(c)),
    };

    if missing.is_empty() {
        Ok(columns)
    } else {
        Err(DataFormatError::MissingColumns(missing))
    }
}

/// Returns None when the row must be dropped (bad coordinates).
fn facility_from_record(record: &csv::StringRecord, cols: &ColumnIndices) -> Option<Facility> {
    let latitude = parse_coordinate(record.get(cols.latitude)?)?;
    let longitude = parse_coordinate(record.get(cols.longitude)?)?;

    let flag = |i: usize| ServiceFlag::from_token(record.get(cols.services[i]).unwrap_or(""));

    Some(Facility {
        name: record.get(cols.name)?.to_string(),
        facility_type: record.get(cols.facility_type)?.to_string(),
        state: record.get(cols.state)?.to_string(),
        lga: record.get(cols.lga)?.to_string(),
        latitude,
        longitude,
        services: ServiceFlags {
            maternal_health: flag(0),
            emergency_transport: flag(1),
            skilled_birth_attendant: flag(2),
            electricity: flag(3),
            c_section: flag(4),
            improved_water: flag(5),
            improved_sanitation: flag(6),
            vaccine_storage: flag(7),
            antenatal_care: flag(8),
            family_planning: flag(9),
            malaria_treatment: flag(10),
        },
    })
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value == 0.0 || !value.is_finite() {
        return None;
    }
    Some(value)
}
