use chrono::{DateTime, Utc};
use rusqlite::Connection;

use super::{validate_token, AuthError, TokenError};
use crate::config::SigningKey;
use crate::db::repository;
use crate::models::Patient;

/// An authenticated patient context, re-derived from the session token
/// on every access.
///
/// Callers pass this explicitly into record operations — there is no
/// ambient "current patient" state anywhere in the crate. Invalidated
/// by dropping it (logout) or by its token expiring.
#[derive(Debug, Clone)]
pub struct Session {
    pub patient_id: i64,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Validate a bearer token and resolve it to the owning patient.
    ///
    /// Fails with `TokenError` for expired or tampered tokens, and with
    /// `InvalidCredentials` when the subject no longer resolves to an
    /// account.
    pub fn from_token(
        conn: &Connection,
        key: &SigningKey,
        token: &str,
    ) -> Result<Self, AuthError> {
        let claims = validate_token(key, token)?;
        let patient = repository::get_patient_by_email(conn, &claims.sub)?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(Self {
            patient_id: patient.id,
            email: patient.email,
            expires_at: DateTime::from_timestamp(claims.exp, 0)
                .ok_or(AuthError::Token(TokenError::Malformed))?,
        })
    }

    /// Build a session directly from a freshly authenticated patient.
    pub fn for_patient(patient: &Patient, expires_at: DateTime<Utc>) -> Self {
        Self {
            patient_id: patient.id,
            email: patient.email.clone(),
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
