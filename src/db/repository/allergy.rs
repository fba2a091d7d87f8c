use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use super::{fmt_datetime, parse_datetime};
use crate::db::DatabaseError;
use crate::models::{Allergy, AllergySeverity};

/// Record a newly diagnosed allergy. Diagnosis date defaults to now
/// when the caller has none.
pub fn insert_allergy(
    conn: &Connection,
    patient_id: i64,
    allergen: &str,
    reaction: &str,
    severity: AllergySeverity,
    diagnosed_date: Option<NaiveDateTime>,
) -> Result<Allergy, DatabaseError> {
    let diagnosed_date = diagnosed_date.unwrap_or_else(|| Utc::now().naive_utc());

    conn.execute(
        "INSERT INTO allergies (patient_id, allergen, reaction, severity, diagnosed_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            patient_id,
            allergen,
            reaction,
            severity.as_str(),
            fmt_datetime(diagnosed_date),
        ],
    )?;

    Ok(Allergy {
        id: conn.last_insert_rowid(),
        patient_id,
        allergen: allergen.to_string(),
        reaction: reaction.to_string(),
        severity,
        diagnosed_date,
    })
}

pub fn get_allergies_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<Allergy>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, allergen, reaction, severity, diagnosed_date
         FROM allergies WHERE patient_id = ?1",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut allergies = Vec::new();
    for row in rows {
        let (id, patient_id, allergen, reaction, severity, diagnosed) = row?;
        allergies.push(Allergy {
            id,
            patient_id,
            allergen,
            reaction,
            severity: AllergySeverity::from_str(&severity)?,
            diagnosed_date: parse_datetime("diagnosed_date", &diagnosed)?,
        });
    }
    Ok(allergies)
}
