use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A registered patient account.
///
/// The password never appears here — only the salted digest produced
/// by `auth::password::hash_password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// Fields collected by the registration form.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
}
