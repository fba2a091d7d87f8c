use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A logged visit to a facility. Append-only.
///
/// `facility_id` is the identifier from the external facility dataset,
/// not a foreign key — facilities are never persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthVisit {
    pub id: i64,
    pub patient_id: i64,
    pub facility_id: String,
    pub visit_date: NaiveDateTime,
    pub reason: String,
    pub notes: String,
    pub follow_up_needed: bool,
}
