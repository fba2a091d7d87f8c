use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LENGTH: usize = 32;
const HASH_LENGTH: usize = 32;
const SCHEME: &str = "pbkdf2-sha256";

/// Hash a password for storage.
///
/// Digest format: `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`.
/// Self-describing, so the iteration count can be raised later without
/// invalidating existing digests.
pub fn hash_password(password: &str) -> String {
    let salt = generate_salt();
    let hash = derive(password, &salt, PBKDF2_ITERATIONS);
    format!(
        "{SCHEME}${PBKDF2_ITERATIONS}${}${}",
        STANDARD.encode(salt),
        STANDARD.encode(hash),
    )
}

/// Check a password against a stored digest.
///
/// Comparison is constant-time; any malformed digest verifies false
/// rather than erroring, so callers can treat this as a plain boolean.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let mut parts = digest.split('$');
    let (Some(scheme), Some(iters), Some(salt_b64), Some(hash_b64), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iters.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(stored)) = (STANDARD.decode(salt_b64), STANDARD.decode(hash_b64)) else {
        return false;
    };

    let computed = derive(password, &salt, iterations);
    computed.ct_eq(&stored).into()
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);
    hash
}

fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
