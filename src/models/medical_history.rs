use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A patient's medical background — at most one row per patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalHistory {
    pub id: i64,
    pub patient_id: i64,
    pub medical_conditions: String,
    pub surgical_history: String,
    pub family_history: String,
    pub current_medications: String,
    pub last_updated: NaiveDateTime,
}

/// The free-text fields submitted on each update.
#[derive(Debug, Clone, Default)]
pub struct MedicalHistoryUpdate {
    pub medical_conditions: String,
    pub surgical_history: String,
    pub family_history: String,
    pub current_medications: String,
}
