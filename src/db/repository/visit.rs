use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use super::{fmt_datetime, parse_datetime};
use crate::db::DatabaseError;
use crate::models::HealthVisit;

/// Log a visit to a facility. Visit date defaults to now.
///
/// Rows come back in insertion order from the read path; any
/// newest-first presentation is the caller's job.
pub fn insert_visit(
    conn: &Connection,
    patient_id: i64,
    facility_id: &str,
    reason: &str,
    notes: &str,
    follow_up_needed: bool,
    visit_date: Option<NaiveDateTime>,
) -> Result<HealthVisit, DatabaseError> {
    let visit_date = visit_date.unwrap_or_else(|| Utc::now().naive_utc());

    conn.execute(
        "INSERT INTO health_visits
         (patient_id, facility_id, visit_date, reason, notes, follow_up_needed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient_id,
            facility_id,
            fmt_datetime(visit_date),
            reason,
            notes,
            follow_up_needed as i32,
        ],
    )?;

    Ok(HealthVisit {
        id: conn.last_insert_rowid(),
        patient_id,
        facility_id: facility_id.to_string(),
        visit_date,
        reason: reason.to_string(),
        notes: notes.to_string(),
        follow_up_needed,
    })
}

pub fn get_visits_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<HealthVisit>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, facility_id, visit_date, reason, notes, follow_up_needed
         FROM health_visits WHERE patient_id = ?1",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, i32>(6)?,
        ))
    })?;

    let mut visits = Vec::new();
    for row in rows {
        let (id, patient_id, facility_id, visit_date, reason, notes, follow_up) = row?;
        visits.push(HealthVisit {
            id,
            patient_id,
            facility_id,
            visit_date: parse_datetime("visit_date", &visit_date)?,
            reason,
            notes,
            follow_up_needed: follow_up != 0,
        });
    }
    Ok(visits)
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
    fn insert_defaults_visit_date_to_now() {
        let conn = open_memory_database().unwrap();
        let pid = patient_id(&conn);

        let before = Utc::now().naive_utc();
        let visit =
            insert_visit(&conn, pid, "phc-00123", "antenatal check", "", true, None).unwrap();
        let after = Utc::now().naive_utc();

        assert!(visit.visit_date >= before && visit.visit_date <= after);
        assert!(visit.follow_up_needed);
    }

    #[test]
    fn visits_listed_in_insertion_order() {
        let conn = open_memory_database().unwrap();
        let pid = patient_id(&conn);

        insert_visit(&conn, pid, "phc-001", "malaria symptoms", "prescribed ACT", false, None)
            .unwrap();
        insert_visit(&conn, pid, "gh-042", "follow-up", "", true, None).unwrap();

        let visits = get_visits_for_patient(&conn, pid).unwrap();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].facility_id, "phc-001");
        assert_eq!(visits[1].facility_id, "gh-042");
    }

    #[test]
    fn facility_id_is_opaque_not_a_foreign_key() {
        let conn = open_memory_database().unwrap();
        let pid = patient_id(&conn);

        // No facilities table exists; any identifier string is accepted.
        let visit = insert_visit(&conn, pid, "not-a-real-facility", "x", "", false, None);
        assert!(visit.is_ok());
    }
}
