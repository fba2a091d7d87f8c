pub mod password;
pub mod token;
pub mod session;

pub use password::*;
pub use token::*;
pub use session::*;

use rusqlite::Connection;
use thiserror::Error;

use crate::config::{SigningKey, LOGIN_TOKEN_TTL};
use crate::db::{repository, DatabaseError};
use crate::models::{NewPatient, Patient};

#[derive(Error, Debug)]
pub enum AuthError {
    /// One signal for both "no such account" and "wrong password" —
    /// callers must not be able to enumerate registered emails.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Session token rejected: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Look up a patient by email and check the password against the
/// stored digest.
pub fn authenticate(
    conn: &Connection,
    email: &str,
    password: &str,
) -> Result<Patient, AuthError> {
    match repository::get_patient_by_email(conn, email)? {
        Some(patient) if verify_password(password, &patient.hashed_password) => {
            tracing::info!(patient_id = patient.id, "Patient authenticated");
            Ok(patient)
        }
        _ => {
            tracing::debug!("Authentication rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Authenticate and issue a session token for the login flow.
pub fn login(
    conn: &Connection,
    key: &SigningKey,
    email: &str,
    password: &str,
) -> Result<(Patient, String), AuthError> {
    let patient = authenticate(conn, email, password)?;
    let token = issue_token(key, &patient.email, LOGIN_TOKEN_TTL)?;
    Ok((patient, token))
}

/// Register a new patient account and log them straight in.
///
/// The password is hashed before it ever reaches the repository.
/// Duplicate email or username surfaces as `DatabaseError::Duplicate`.
pub fn register(
    conn: &Connection,
    key: &SigningKey,
    new: &NewPatient,
    password: &str,
) -> Result<(Patient, String), AuthError> {
    let digest = hash_password(password);
    let patient = repository::insert_patient(conn, new, &digest)?;
    let token = issue_token(key, &patient.email, LOGIN_TOKEN_TTL)?;
    Ok((patient, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use chrono::NaiveDate;

    fn key() -> SigningKey {
        SigningKey::from_bytes(b"test-signing-secret".to_vec())
    }

    fn sample() -> NewPatient {
        NewPatient {
            email: "ada@example.ng".into(),
            username: "ada".into(),
            full_name: "Ada Obi".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            phone_number: "08012345678".into(),
        }
    }

    #[test]
    fn register_then_login_round_trip() {
        let conn = open_memory_database().unwrap();
        let key = key();

        let (registered, _token) = register(&conn, &key, &sample(), "s3cret-pass").unwrap();
        assert_ne!(registered.hashed_password, "s3cret-pass");

        let (logged_in, token) = login(&conn, &key, "ada@example.ng", "s3cret-pass").unwrap();
        assert_eq!(logged_in.id, registered.id);

        let claims = validate_token(&key, &token).unwrap();
        assert_eq!(claims.sub, "ada@example.ng");
    }

    #[test]
    fn duplicate_registration_fails_with_duplicate() {
        let conn = open_memory_database().unwrap();
        let key = key();

        register(&conn, &key, &sample(), "first").unwrap();
        let err = register(&conn, &key, &sample(), "second").unwrap_err();
        assert!(matches!(
            err,
            AuthError::Database(DatabaseError::Duplicate { .. })
        ));
    }

    #[test]
    fn wrong_password_and_unknown_email_look_identical() {
        let conn = open_memory_database().unwrap();
        let key = key();
        register(&conn, &key, &sample(), "s3cret-pass").unwrap();

        let wrong_password = authenticate(&conn, "ada@example.ng", "nope").unwrap_err();
        let unknown_email = authenticate(&conn, "ghost@example.ng", "nope").unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    }
}
