use chrono::Utc;
use rusqlite::{params, Connection};

use super::{fmt_date, fmt_datetime, parse_date, parse_datetime};
use crate::db::DatabaseError;
use crate::models::{NewPatient, Patient};

/// Insert a new patient row.
///
/// `hashed_password` must already be a digest from
/// `auth::password::hash_password` — plaintext never reaches this layer.
/// Uniqueness of email and username is enforced by the schema, not
/// pre-checked here.
pub fn insert_patient(
    conn: &Connection,
    new: &NewPatient,
    hashed_password: &str,
) -> Result<Patient, DatabaseError> {
    let created_at = Utc::now().naive_utc();

    conn.execute(
        "INSERT INTO patients (email, username, hashed_password, full_name,
         date_of_birth, phone_number, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
        params![
            new.email,
            new.username,
            hashed_password,
            new.full_name,
            fmt_date(new.date_of_birth),
            new.phone_number,
            fmt_datetime(created_at),
        ],
    )
    .map_err(map_unique_violation)?;

    let id = conn.last_insert_rowid();
    tracing::info!(patient_id = id, "Registered patient");

    Ok(Patient {
        id,
        email: new.email.clone(),
        username: new.username.clone(),
        hashed_password: hashed_password.to_string(),
        full_name: new.full_name.clone(),
        date_of_birth: new.date_of_birth,
        phone_number: new.phone_number.clone(),
        is_active: true,
        created_at,
    })
}

pub fn get_patient_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<Patient>, DatabaseError> {
    get_patient_where(conn, "email = ?1", email)
}

pub fn get_patient_by_id(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    get_patient_where(conn, "id = ?1", id)
}

fn get_patient_where<P: rusqlite::ToSql>(
    conn: &Connection,
    predicate: &str,
    param: P,
) -> Result<Option<Patient>, DatabaseError> {
    let sql = format!(
        "SELECT id, email, username, hashed_password, full_name,
         date_of_birth, phone_number, is_active, created_at
         FROM patients WHERE {predicate}"
    );
    let mut stmt = conn.prepare(&sql)?;

    let result = stmt.query_row(params![param], |row| {
        Ok(PatientRow {
            id: row.get(0)?,
            email: row.get(1)?,
            username: row.get(2)?,
            hashed_password: row.get(3)?,
            full_name: row.get(4)?,
            date_of_birth: row.get(5)?,
            phone_number: row.get(6)?,
            is_active: row.get::<_, i32>(7)?,
            created_at: row.get(8)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(patient_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// Internal row type for Patient mapping
struct PatientRow {
    id: i64,
    email: String,
    username: String,
    hashed_password: String,
    full_name: String,
    date_of_birth: String,
    phone_number: String,
    is_active: i32,
    created_at: String,
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: row.id,
        email: row.email,
        username: row.username,
        hashed_password: row.hashed_password,
        full_name: row.full_name,
        date_of_birth: parse_date("date_of_birth", &row.date_of_birth)?,
        phone_number: row.phone_number,
        is_active: row.is_active != 0,
        created_at: parse_datetime("created_at", &row.created_at)?,
    })
}

/// Name the offending column when a unique constraint trips, so the
/// registration form can say which field is taken.
fn map_unique_violation(err: rusqlite::Error) -> DatabaseError {
    if let rusqlite::Error::SqliteFailure(e, Some(msg)) = &err {
        if e.code == rusqlite::ErrorCode::ConstraintViolation {
            let field = if msg.contains("patients.email") {
                "email"
            } else if msg.contains("patients.username") {
                "username"
            } else {
                "patient"
            };
            return DatabaseError::Duplicate { field: field.into() };
        }
    }
    err.into()
}
