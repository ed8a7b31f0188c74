use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, Rejection};

/// Lifetime of every issued credential.
pub const TOKEN_TTL_DAYS: i64 = 365;

/// Identity claim carried by a credential: the email plus whatever other
/// attributes the caller asked to have signed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies HS256 credentials with the process-wide secret.
///
/// Built once at startup. Without a secret every issuance fails with a
/// signing error and every verification is rejected.
pub struct TokenService {
    keys: Option<Keys>,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: Option<&str>) -> Self {
        let keys = secret.filter(|s| !s.is_empty()).map(|s| Keys {
            encoding: EncodingKey::from_secret(s.as_bytes()),
            decoding: DecodingKey::from_secret(s.as_bytes()),
        });

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Callers may sign arbitrary attributes, including an `aud`.
        validation.validate_aud = false;

        Self { keys, validation }
    }

    pub fn has_secret(&self) -> bool {
        self.keys.is_some()
    }

    /// Signs `claim`, which must carry a non-empty string `email`.
    pub fn issue(&self, mut claim: Map<String, Value>) -> Result<String, AppError> {
        let email = match claim.remove("email") {
            Some(Value::String(email)) if !email.is_empty() => email,
            _ => return Err(AppError::validation("Email is required")),
        };
        if claim.contains_key("exp") {
            return Err(AppError::signing("claim already carries an exp attribute"));
        }
        let iat = match claim.remove("iat") {
            None => Utc::now().timestamp(),
            Some(value) => value
                .as_i64()
                .ok_or_else(|| AppError::signing(format!("iat must be an integer timestamp, got {value}")))?,
        };
        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| AppError::signing("signing secret is not configured"))?;

        // Expiry is anchored on the iat that is actually signed.
        let exp = iat + Duration::days(TOKEN_TTL_DAYS).num_seconds();
        let claims = Claims { email, iat, exp, attributes: claim };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AppError::signing(format!("Token signing failed: {e}")))
    }

    /// Checks an `Authorization` header value and returns the claims of a
    /// valid bearer credential.
    pub fn verify_bearer(&self, header: Option<&str>) -> Result<Claims, AppError> {
        let header = header.ok_or(AppError::Unauthorized(Rejection::MissingHeader))?;
        let token = bearer_token(header).ok_or(AppError::Unauthorized(Rejection::MalformedHeader))?;
        self.verify(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let keys = self.keys.as_ref().ok_or(AppError::Unauthorized(Rejection::NoSecret))?;

        decode::<Claims>(token, &keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => Rejection::Expired,
                    ErrorKind::InvalidSignature => Rejection::BadSignature,
                    _ => Rejection::MalformedToken,
                };
                AppError::Unauthorized(reason)
            })
    }
}

/// Token part of a `Bearer <token>` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("Bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}
