//! Bearer tokens for the admin endpoints
//!
//! The community website signs HS256 tokens with the shared `JWT_SECRET`;
//! the subject is the website's admin user id. `issue` exists for tests and
//! local tooling.

use chrono::{Duration, Utc};
use clan_core::Actor;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: Duration,
}

impl JwtService {
    /// `token_expiry` in seconds, applied to issued tokens
    #[must_use]
    pub fn new(secret: &str, token_expiry: i64) -> Self {
        let mut validation = Validation::default();
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_expiry: Duration::seconds(token_expiry),
        }
    }

    pub fn issue(&self, actor_id: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: actor_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_expiry).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify signature and expiry, then name the actor
    pub fn authenticate(&self, token: &str) -> Result<Actor, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })?
            .claims;

        let subject = claims.sub.trim();
        if subject.is_empty() {
            return Err(AppError::InvalidToken);
        }
        Ok(Actor::new(subject))
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("token_expiry_secs", &self.token_expiry.num_seconds())
            .finish_non_exhaustive()
    }
}
