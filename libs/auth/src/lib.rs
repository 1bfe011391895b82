//! Bearer-token authentication.
//!
//! Every `/api` route extracts [`AuthClaims`]; the `sub` claim of the
//! verified token is the record owner for the whole request.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use common_errors::AppError;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingToken,
    #[error("authorization header is not a bearer token")]
    MalformedHeader,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::unauthorized("UNAUTHORIZED", &err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// HS256 verifier built once at startup from `JWT_SECRET`.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtDecoder {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens are issued by an external identity provider; only the
        // signature and expiry are checked here.
        validation.validate_aud = false;
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let data =
            decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

/// The authenticated caller, as extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthClaims {
    pub user_id: String,
}

fn bearer_token(header: &str) -> Result<&str, AuthError> {
    header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)
}

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
    JwtDecoder: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts, state: &S,
    ) -> Result<Self, Self::Rejection> {
        let decoder = JwtDecoder::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let claims = decoder.decode(bearer_token(header)?)?;
        Ok(AuthClaims {
            user_id: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    fn token(secret: &str, sub: &str, exp: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn now_epoch() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    #[test]
    fn valid_token_round_trips() {
        let decoder = JwtDecoder::new("sekrit");
        let token = token("sekrit", "user-1", now_epoch() + 3600);

        let claims = decoder.decode(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let decoder = JwtDecoder::new("sekrit");
        let token = token("not-the-secret", "user-1", now_epoch() + 3600);

        assert!(matches!(
            decoder.decode(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let decoder = JwtDecoder::new("sekrit");
        // Past the default validation leeway.
        let token = token("sekrit", "user-1", now_epoch() - 600);

        assert!(decoder.decode(&token).is_err());
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert!(matches!(
            bearer_token("Token abc"),
            Err(AuthError::MalformedHeader)
        ));
        assert_eq!(bearer_token("Bearer abc").unwrap(), "abc");
    }
}
