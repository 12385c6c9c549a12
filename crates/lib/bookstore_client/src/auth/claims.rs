//! Access-token claim decoding.
//!
//! The client reads `username` and `role` to pick the landing area. The
//! signature is not checked here; the services verify every token they
//! receive.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::error::ApiError;
use crate::models::AccessClaims;

/// Decode a JWT's payload without verifying its signature or expiry.
pub fn decode_unverified(token: &str) -> Result<AccessClaims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| ApiError::malformed("access token", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(claims: serde_json::Value, secret: &[u8]) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn decodes_identity_claims() {
        let jwt = token(
            serde_json::json!({"user_id": 7, "username": "alice", "role": "admin", "exp": 1}),
            b"server-secret",
        );
        let claims = decode_unverified(&jwt).unwrap();
        assert_eq!(claims.user_id, Some(7));
        assert_eq!(claims.username.as_deref(), Some("alice"));
        assert_eq!(claims.role.as_deref(), Some("admin"));
    }

    #[test]
    fn expired_token_still_decodes() {
        let past = chrono::Utc::now().timestamp() - 3600;
        let jwt = token(
            serde_json::json!({"username": "bob", "role": "user", "exp": past}),
            b"another-secret",
        );
        let claims = decode_unverified(&jwt).unwrap();
        assert_eq!(claims.username.as_deref(), Some("bob"));
        assert_eq!(claims.exp, Some(past));
    }

    #[test]
    fn refreshed_token_without_identity_decodes() {
        let jwt = token(serde_json::json!({"user_id": 3}), b"s");
        let claims = decode_unverified(&jwt).unwrap();
        assert!(claims.username.is_none());
        assert!(claims.role.is_none());
    }

    #[test]
    fn garbage_is_malformed() {
        let err = decode_unverified("not-a-jwt").unwrap_err();
        assert!(matches!(err, ApiError::ServerOrNetwork { status: None, .. }));
    }
}
