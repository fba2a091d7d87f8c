use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::config::SigningKey;

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token signature does not verify")]
    BadSignature,

    #[error("Token expired")]
    Expired,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Patient email.
    pub sub: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds. A token is current strictly before this.
    pub exp: i64,
}

/// Issue a signed session token.
///
/// Format: `base64url(JSON claims) "." base64url(HMAC-SHA256(payload))`,
/// keyed by the process-wide signing secret. Self-contained — nothing
/// is stored server-side.
pub fn issue_token(
    key: &SigningKey,
    email: &str,
    ttl: Duration,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: email.to_string(),
        iat: now,
        exp: now + ttl.as_secs() as i64,
    };

    let json = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;
    let payload = URL_SAFE_NO_PAD.encode(json);
    let signature = sign(key, payload.as_bytes())?;
    Ok(format!("{payload}.{}", URL_SAFE_NO_PAD.encode(signature)))
}

/// Validate a token against the signing key and the current clock.
///
/// Sessions are re-derived from the token on every access — there is
/// no trusted server-side session flag to consult.
pub fn validate_token(key: &SigningKey, token: &str) -> Result<Claims, TokenError> {
    validate_token_at(key, token, Utc::now().timestamp())
}

/// Validation against an explicit clock, for callers that pin time.
pub fn validate_token_at(
    key: &SigningKey,
    token: &str,
    now: i64,
) -> Result<Claims, TokenError> {
    let (payload, signature_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| TokenError::Malformed)?;

    // Signature first: claims from an unverified payload are never parsed.
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|_| TokenError::BadSignature)?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| TokenError::BadSignature)?;

    let json = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;
    let claims: Claims = serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

    if now >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

fn sign(key: &SigningKey, payload: &[u8]) -> Result<Vec<u8>, TokenError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|_| TokenError::BadSignature)?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_TOKEN_TTL, LOGIN_TOKEN_TTL};

    fn key() -> SigningKey {
        SigningKey::from_bytes(b"test-signing-secret".to_vec())
    }

    #[test]
    fn issued_token_validates() {
        let key = key();
        let token = issue_token(&key, "ada@example.ng", DEFAULT_TOKEN_TTL).unwrap();
        let claims = validate_token(&key, &token).unwrap();
        assert_eq!(claims.sub, "ada@example.ng");
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL.as_secs() as i64);
    }

    #[test]
    fn current_just_before_expiry_expired_just_after() {
        let key = key();
        let token = issue_token(&key, "ada@example.ng", LOGIN_TOKEN_TTL).unwrap();
        let claims = validate_token(&key, &token).unwrap();

        assert!(validate_token_at(&key, &token, claims.exp - 1).is_ok());
        assert_eq!(
            validate_token_at(&key, &token, claims.exp + 1).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn wrong_key_rejected() {
        let token = issue_token(&key(), "ada@example.ng", DEFAULT_TOKEN_TTL).unwrap();
        let other = SigningKey::from_bytes(b"different-secret".to_vec());
        assert_eq!(
            validate_token(&other, &token).unwrap_err(),
            TokenError::BadSignature
        );
    }

    #[test]
    fn tampered_payload_rejected() {
        let key = key();
        let token = issue_token(&key, "ada@example.ng", DEFAULT_TOKEN_TTL).unwrap();

        let (payload, sig) = token.split_once('.').unwrap();
        let mut json = URL_SAFE_NO_PAD.decode(payload).unwrap();
        let text = String::from_utf8(json.clone()).unwrap();
        json = text.replace("ada@", "eve@").into_bytes();
        let forged = format!("{}.{sig}", URL_SAFE_NO_PAD.encode(json));

        assert_eq!(
            validate_token(&key, &forged).unwrap_err(),
            TokenError::BadSignature
        );
    }

    #[test]
    fn garbage_tokens_are_malformed() {
        let key = key();
        for token in ["", "no-dot-here", "a.b.c.d", "!!!.???"] {
            assert_eq!(
                validate_token(&key, token).unwrap_err(),
                TokenError::Malformed,
                "token {token:?}"
            );
        }
    }
}
