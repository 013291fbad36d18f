use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::config::JwtSecret;

// Errors returned by access-token verification + claim checks.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token signed with an unexpected algorithm")]
    WrongAlgorithm,
    #[error("malformed token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => Self::Expired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => Self::WrongAlgorithm,
            _ => Self::Malformed(e),
        }
    }
}

/// Access token (JWT) claims the authenticator reads.
///
/// NOTE:
/// - The user identifier is carried in `id`; `sub` is the fallback when `id` is absent.
///   Both may be present, `id` wins.
/// - `exp` is not read here, but jsonwebtoken requires and checks it
///   (default `required_spec_claims`).
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
}

impl AccessTokenClaims {
    pub fn user_id(self) -> Option<String> {
        self.id.or(self.sub)
    }
}

/// What the verifier hands back to the authenticator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: String,
}

/// Token Verifier seam. `JwtVerifier` is the production implementation.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError>;
}

/// HMAC (HS256/HS384/HS512) access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(
        secret: &JwtSecret,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = leeway_seconds;

        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key,
            validation,
        }
    }

    // Signature + exp (+ iss/aud when configured).
    pub fn decode(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let user_id = self
            .decode(token)?
            .user_id()
            .filter(|id| !id.trim().is_empty())
            .ok_or(TokenError::EmptyClaim("id"))?;

        Ok(VerifiedToken { user_id })
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use jsonwebtoken::{EncodingKey, Header, get_current_timestamp};
    use serde_json::json;

    pub const SECRET: &str = "test-secret";

    pub fn sign(claims: &serde_json::Value, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    pub fn valid_for(user_id: &str) -> String {
        sign(
            &json!({ "id": user_id, "iat": get_current_timestamp(), "exp": get_current_timestamp() + 600 }),
            SECRET,
        )
    }

    pub fn expired_for(user_id: &str) -> String {
        sign(
            &json!({ "id": user_id, "exp": get_current_timestamp() - 3600 }),
            SECRET,
        )
    }
}
