//! Session token verification.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use academy_core::config::AuthConfig;
use academy_core::error::AppError;
use academy_core::traits::Clock;

use super::claims::Claims;

/// Checks token signature and expiration against the injected clock.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a decoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against `clock`, not the system time.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Verifies a token. Fails with `INVALID_TOKEN`.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::invalid_token("Invalid token signature")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::invalid_token("Invalid token format")
                }
                _ => AppError::invalid_token(format!("Token validation failed: {e}")),
            })?
            .claims;

        if claims.is_expired_at(self.clock.now()) {
            return Err(AppError::invalid_token("Token has expired"));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;

    use academy_core::ManualClock;

    use super::*;
    use crate::jwt::JwtEncoder;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_round_trip_and_expiry() {
        let clock = Arc::new(ManualClock::starting_now());
        let encoder = JwtEncoder::new(&config("s3cret"));
        let decoder = JwtDecoder::new(&config("s3cret"), clock.clone());

        let (uid, sid) = (Uuid::new_v4(), Uuid::new_v4());
        let now = clock.now();
        let token = encoder
            .encode(uid, sid, now, now + Duration::hours(1))
            .unwrap();

        let claims = decoder.decode(&token).unwrap();
        assert_eq!((claims.uid, claims.sid), (uid, sid));

        clock.advance(Duration::hours(1));
        let err = decoder.decode(&token).unwrap_err();
        assert_eq!(err.code(), "INVALID_TOKEN");
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let clock = Arc::new(ManualClock::starting_now());
        let now = clock.now();
        let token = JwtEncoder::new(&config("other"))
            .encode(Uuid::new_v4(), Uuid::new_v4(), now, now + Duration::hours(1))
            .unwrap();

        let err = JwtDecoder::new(&config("s3cret"), clock)
            .decode(&token)
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_TOKEN");
        assert!(JwtDecoder::new(&config("s3cret"), Arc::new(ManualClock::starting_now()))
            .decode("not-a-token")
            .is_err());
    }
}
