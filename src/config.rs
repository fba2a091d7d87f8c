use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Carefinder";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the session token signing secret.
pub const SIGNING_SECRET_ENV: &str = "CAREFINDER_SIGNING_SECRET";

/// Default lifetime of a session token when the caller does not ask
/// for a specific one.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Lifetime requested by the login/registration flow.
pub const LOGIN_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Get the application data directory
/// ~/Carefinder/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Carefinder")
}

/// Default location of the patient records database.
pub fn patient_db_path() -> PathBuf {
    app_data_dir().join("patients.db")
}

/// Token signing secret for this process.
///
/// Loaded from the environment once at startup — never ship a
/// hard-coded secret. Empty values are rejected.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn from_env() -> Option<Self> {
        let secret = std::env::var(SIGNING_SECRET_ENV).ok()?;
        if secret.is_empty() {
            return None;
        }
        Some(Self(secret.into_bytes()))
    }

    /// Build a key from raw bytes (for tests and embedding callers).
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningKey {
    // Never print key material
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Carefinder"));
    }

    #[test]
    fn patient_db_under_app_data() {
        let db = patient_db_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("patients.db"));
    }

    #[test]
    fn signing_key_debug_hides_material() {
        let key = SigningKey::from_bytes(b"super-secret".to_vec());
        assert_eq!(format!("{key:?}"), "SigningKey(..)");
    }

    #[test]
    fn login_ttl_longer_than_default() {
        assert!(LOGIN_TOKEN_TTL > DEFAULT_TOKEN_TTL);
    }
}
