use chrono::Utc;
use rusqlite::{params, Connection};

use super::{fmt_datetime, parse_datetime};
use crate::db::DatabaseError;
use crate::models::{MedicalHistory, MedicalHistoryUpdate};

/// Create or replace a patient's medical history in one statement.
///
/// The UNIQUE(patient_id) constraint plus ON CONFLICT keeps this atomic:
/// concurrent submissions can never leave two rows for one patient.
pub fn upsert_medical_history(
    conn: &Connection,
    patient_id: i64,
    update: &MedicalHistoryUpdate,
) -> Result<MedicalHistory, DatabaseError> {
    let last_updated = Utc::now().naive_utc();

    conn.execute(
        "INSERT INTO medical_histories
         (patient_id, medical_conditions, surgical_history, family_history,
          current_medications, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(patient_id) DO UPDATE SET
             medical_conditions = excluded.medical_conditions,
             surgical_history = excluded.surgical_history,
             family_history = excluded.family_history,
             current_medications = excluded.current_medications,
             last_updated = excluded.last_updated",
        params![
            patient_id,
            update.medical_conditions,
            update.surgical_history,
            update.family_history,
            update.current_medications,
            fmt_datetime(last_updated),
        ],
    )?;

    tracing::debug!(patient_id, "Medical history saved");

    // Re-read rather than trusting last_insert_rowid: on the update arm
    // the rowid of the existing row is what callers need.
    get_medical_history(conn, patient_id)?.ok_or(DatabaseError::NotFound {
        entity_type: "MedicalHistory".into(),
        id: patient_id.to_string(),
    })
}

pub fn get_medical_history(
    conn: &Connection,
    patient_id: i64,
) -> Result<Option<MedicalHistory>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, medical_conditions, surgical_history,
         family_history, current_medications, last_updated
         FROM medical_histories WHERE patient_id = ?1",
    )?;

    let result = stmt.query_row(params![patient_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
        ))
    });

    match result {
        Ok((id, patient_id, conditions, surgical, family, medications, updated)) => {
            Ok(Some(MedicalHistory {
                id,
                patient_id,
                medical_conditions: conditions,
                surgical_history: surgical,
                family_history: family,
                current_medications: medications,
                last_updated: parse_datetime("last_updated", &updated)?,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::repository::insert_patient;
    use crate::models::NewPatient;
    use chrono::NaiveDate;

    fn patient_id(conn: &Connection) -> i64 {
        let new = NewPatient {
            email: "ada@example.ng".into(),
            username: "ada".into(),
            full_name: "Ada Obi".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            phone_number: "08012345678".into(),
        };
        insert_patient(conn, &new, "digest").unwrap().id
    }

    #[test]
    fn first_upsert_creates_record() {
        let conn = open_memory_database().unwrap();
        let pid = patient_id(&conn);

        assert!(get_medical_history(&conn, pid).unwrap().is_none());

        let update = MedicalHistoryUpdate {
            medical_conditions: "asthma".into(),
            ..Default::default()
        };
        let history = upsert_medical_history(&conn, pid, &update).unwrap();
        assert_eq!(history.patient_id, pid);
        assert_eq!(history.medical_conditions, "asthma");
    }

    #[test]
    fn second_upsert_replaces_not_duplicates() {
        let conn = open_memory_database().unwrap();
        let pid = patient_id(&conn);

        let first = upsert_medical_history(
            &conn,
            pid,
            &MedicalHistoryUpdate {
                medical_conditions: "asthma".into(),
                ..Default::default()
            },
        )
        .unwrap();

        let second = upsert_medical_history(
            &conn,
            pid,
            &MedicalHistoryUpdate {
                medical_conditions: "asthma, hypertension".into(),
                current_medications: "amlodipine".into(),
                ..Default::default()
            },
        )
        .unwrap();

        // Same row, new values
        assert_eq!(second.id, first.id);
        assert_eq!(second.medical_conditions, "asthma, hypertension");
        assert_eq!(second.current_medications, "amlodipine");

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM medical_histories WHERE patient_id = ?1",
                params![pid],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn histories_are_scoped_per_patient() {
        let conn = open_memory_database().unwrap();
        let pid = patient_id(&conn);
        let other = insert_patient(
            &conn,
            &NewPatient {
                email: "bola@example.ng".into(),
                username: "bola".into(),
                full_name: "Bola Ade".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1985, 9, 3).unwrap(),
                phone_number: "08087654321".into(),
            },
            "digest",
        )
        .unwrap()
        .id;

        upsert_medical_history(
            &conn,
            pid,
            &MedicalHistoryUpdate {
                medical_conditions: "asthma".into(),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(get_medical_history(&conn, other).unwrap().is_none());
    }
}
