pub mod patient;
pub mod medical_history;
pub mod allergy;
pub mod visit;

pub use patient::*;
pub use medical_history::*;
pub use allergy::*;
pub use visit::*;

use chrono::{NaiveDate, NaiveDateTime};

use super::DatabaseError;

// Timestamps are stored as text in this format; the optional fraction
// keeps round-trips exact for sub-second values.
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FMT: &str = "%Y-%m-%d";

pub(crate) fn fmt_datetime(t: NaiveDateTime) -> String {
    t.format(DATETIME_FMT).to_string()
}

pub(crate) fn parse_datetime(column: &str, s: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).map_err(|_| {
        DatabaseError::MalformedTimestamp {
            column: column.into(),
            value: s.into(),
        }
    })
}

pub(crate) fn fmt_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

pub(crate) fn parse_date(column: &str, s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|_| DatabaseError::MalformedTimestamp {
        column: column.into(),
        value: s.into(),
    })
}
