use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::AllergySeverity;

/// One diagnosed allergy. Append-only — no edit or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allergy {
    pub id: i64,
    pub patient_id: i64,
    pub allergen: String,
    pub reaction: String,
    pub severity: AllergySeverity,
    pub diagnosed_date: NaiveDateTime,
}
